use log::{info, warn};

use crate::gateway::CallGateway;
use crate::types::{BroadcastReport, BroadcastRequest, CallStatus, DispatchOutcome};

const UNKNOWN_FAILURE: &str = "call placement failed";

// One outcome per destination, in input order. Failures never stop the loop.
pub async fn dispatch<G>(gateway: &G, request: &BroadcastRequest) -> BroadcastReport
where
    G: CallGateway + ?Sized,
{
    let mut outcomes = Vec::with_capacity(request.destinations.len());

    for destination in &request.destinations {
        info!("Placing call to {}", destination);

        let status = match gateway.place_call(&request.audio_url, destination).await {
            Ok(call_id) => {
                info!("Call to {} created: {}", destination, call_id);
                CallStatus::Succeeded { call_id }
            }
            Err(e) => {
                let mut message = e.to_string();
                if message.trim().is_empty() {
                    message = UNKNOWN_FAILURE.to_string();
                }
                warn!("Call to {} failed: {}", destination, message);
                CallStatus::Failed { message }
            }
        };

        outcomes.push(DispatchOutcome {
            destination: destination.clone(),
            status,
        });
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    info!(
        "Broadcast finished: {} succeeded, {} failed",
        succeeded,
        outcomes.len() - succeeded
    );

    BroadcastReport { outcomes }
}
