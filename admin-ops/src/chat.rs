use rand::distributions::Alphanumeric;
use rand::Rng;
use shared::{ApiError, ChatRequest, ChatResponse, ConsultApi};
use tracing::debug;

/// Typed on its own, opens scheduling without asking the assistant
pub const SCHEDULE_COMMAND: &str = "/schedule";

const SCHEDULE_KEYWORDS: [&str; 10] = [
    "schedule a consultation",
    "schedule consultation",
    "book a consultation",
    "book consultation",
    "schedule a call",
    "book a call",
    "schedule meeting",
    "book meeting",
    "schedule an appointment",
    "book an appointment",
];

/// Session id in the `<prefix>_<9 random chars>_<unix millis>` form the
/// backend expects. The chat page uses `session`, the widget `widget_session`.
pub fn new_session_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!(
        "{}_{}_{}",
        prefix,
        suffix,
        chrono::Utc::now().timestamp_millis()
    )
}

/// Case-insensitive match against the booking phrases
pub fn is_schedule_intent(text: &str) -> bool {
    let text = text.to_lowercase();
    SCHEDULE_KEYWORDS.iter().any(|k| text.contains(k))
}

/// What came of one [`ChatController::send`]
#[derive(Debug, Clone)]
pub enum ChatOutcome {
    /// Blank input, nothing sent
    Empty,
    /// The schedule command; the assistant was not asked
    ScheduleRequested,
    Reply {
        response: ChatResponse,
        /// The message or the reply asked to book a consultation
        schedule_intent: bool,
    },
}

/// Forwards messages for one conversation
pub struct ChatController<'a, A> {
    api: &'a A,
    session_id: String,
}

impl<'a, A: ConsultApi> ChatController<'a, A> {
    pub fn new(api: &'a A, prefix: &str) -> Self {
        Self {
            api,
            session_id: new_session_id(prefix),
        }
    }

    /// Continue an existing conversation
    pub fn resume(api: &'a A, session_id: impl Into<String>) -> Self {
        Self {
            api,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn send(&mut self, text: &str) -> Result<ChatOutcome, ApiError> {
        let message = text.trim();
        if message.is_empty() {
            return Ok(ChatOutcome::Empty);
        }
        if message.eq_ignore_ascii_case(SCHEDULE_COMMAND) {
            return Ok(ChatOutcome::ScheduleRequested);
        }

        debug!("Sending chat message in {}", self.session_id);
        let response = self
            .api
            .chat(&ChatRequest {
                message: message.to_string(),
                session_id: Some(self.session_id.clone()),
            })
            .await?;

        if response.session_id != self.session_id {
            debug!("Backend reassigned session {} -> {}", self.session_id, response.session_id);
            self.session_id = response.session_id.clone();
        }
        let schedule_intent = is_schedule_intent(message) || is_schedule_intent(&response.response);
        Ok(ChatOutcome::Reply {
            response,
            schedule_intent,
        })
    }
}
