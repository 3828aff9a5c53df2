use serde::Serialize;

#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub audio_url: String,
    pub destinations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum CallStatus {
    #[serde(rename = "success")]
    Succeeded {
        #[serde(rename = "callSid")]
        call_id: String,
    },
    #[serde(rename = "failed")]
    Failed {
        #[serde(rename = "error")]
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    #[serde(rename = "phoneNumber")]
    pub destination: String,
    #[serde(flatten)]
    pub status: CallStatus,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, CallStatus::Succeeded { .. })
    }
}

#[derive(Debug, Clone)]
pub struct BroadcastReport {
    pub outcomes: Vec<DispatchOutcome>,
}

#[derive(Serialize)]
pub struct SendVoiceResponse {
    pub success: bool,
    pub results: Vec<DispatchOutcome>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
}
