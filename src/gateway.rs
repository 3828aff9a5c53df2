use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::TwilioConfig;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected gateway response: {0}")]
    MalformedResponse(String),
}

/// Places a call that plays `audio_url` to `to` and returns the provider's
/// call identifier.
#[async_trait]
pub trait CallGateway: Send + Sync {
    async fn place_call(&self, audio_url: &str, to: &str) -> Result<String, GatewayError>;
}

#[derive(Deserialize)]
struct CallResource {
    sid: Option<String>,
}

#[derive(Deserialize)]
struct TwilioErrorBody {
    code: Option<u64>,
    message: Option<String>,
}

pub struct TwilioClient {
    http: reqwest::Client,
    calls_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(config: &TwilioConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            calls_url: format!(
                "{}/2010-04-01/Accounts/{}/Calls.json",
                config.api_base.trim_end_matches('/'),
                config.account_sid
            ),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
        })
    }
}

#[async_trait]
impl CallGateway for TwilioClient {
    async fn place_call(&self, audio_url: &str, to: &str) -> Result<String, GatewayError> {
        let twiml = play_twiml(audio_url);
        debug!("POST {} to={} twiml={}", self.calls_url, to, twiml);

        let response = self
            .http
            .post(&self.calls_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to),
                ("From", self.from_number.as_str()),
                ("Twiml", twiml.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let call: CallResource = response.json().await?;
        call.sid
            .filter(|sid| !sid.is_empty())
            .ok_or_else(|| GatewayError::MalformedResponse("missing call sid".into()))
    }
}

/// TwiML instructing the callee's leg to play the audio once answered.
pub fn play_twiml(audio_url: &str) -> String {
    format!("<Response><Play>{}</Play></Response>", escape_xml(audio_url))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn rejection_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<TwilioErrorBody>(body) {
        Ok(TwilioErrorBody {
            message: Some(message),
            code,
        }) if !message.is_empty() => match code {
            Some(code) => format!("{} (code {})", message, code),
            None => message,
        },
        _ => format!("gateway returned {}", status),
    }
}
