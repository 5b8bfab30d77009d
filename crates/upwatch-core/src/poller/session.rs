//! Per-upload poll state and the rules that turn a status into a display step.

use crate::status::{percent_of, DecodeError, FetchError, StatusResponse};

/// Once the bar has shown this much, it never moves backwards.
const NO_REGRESS_FROM: u8 = 95;

/// What the poll loop should do after one status check.
#[derive(Debug)]
pub enum Step {
    /// No usable status yet; leave the display alone and check again later.
    NotReady,
    /// Show this percentage and check again later.
    Progress(u8),
    /// Upload finished: full bar, ready message, stop.
    Done,
    /// Status service answered with something unreadable: stop.
    Broken(DecodeError),
}

/// State of one upload being watched.
#[derive(Debug, Clone)]
pub struct UploadSession {
    transport_id: String,
    ready_message: String,
    tolerance_percent: u8,
    old_percent: u8,
    consecutive_not_ready: u32,
}

impl UploadSession {
    pub fn new(transport_id: String, ready_message: String, tolerance_percent: u8) -> Self {
        Self {
            transport_id,
            ready_message,
            tolerance_percent,
            old_percent: 0,
            consecutive_not_ready: 0,
        }
    }

    pub fn transport_id(&self) -> &str {
        &self.transport_id
    }

    pub fn ready_message(&self) -> &str {
        &self.ready_message
    }

    /// Last percentage shown on the bar.
    pub fn old_percent(&self) -> u8 {
        self.old_percent
    }

    pub fn consecutive_not_ready(&self) -> u32 {
        self.consecutive_not_ready
    }

    /// Fold one fetch result into the session.
    ///
    /// Transport and HTTP failures are indistinguishable from the server having
    /// no record for the token, so both count as [`StatusResponse::Unavailable`].
    /// A body that cannot be decoded is a broken service and never counts as
    /// unavailable, whatever the percentage.
    /// Unavailable at or below the tolerance means the record does not exist yet;
    /// above it, the server already cleared a finished upload.
    pub fn observe(&mut self, result: Result<StatusResponse, FetchError>) -> Step {
        let status = match result {
            Ok(status) => status,
            Err(FetchError::Decode(e)) => return Step::Broken(e),
            Err(e) => {
                tracing::debug!(transport_id = %self.transport_id, "status fetch failed: {}", e);
                StatusResponse::Unavailable
            }
        };

        match status {
            StatusResponse::Unavailable if self.old_percent <= self.tolerance_percent => {
                self.consecutive_not_ready += 1;
                Step::NotReady
            }
            StatusResponse::Unavailable => Step::Done,
            StatusResponse::Progress { pos, length } => {
                let mut percent = percent_of(pos, length);
                if self.old_percent >= NO_REGRESS_FROM && percent < self.old_percent {
                    percent = self.old_percent;
                }
                self.consecutive_not_ready = 0;
                if percent == 100 {
                    self.old_percent = 100;
                    return Step::Done;
                }
                self.old_percent = percent;
                Step::Progress(percent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> UploadSession {
        UploadSession::new("tok123".to_string(), "All done!".to_string(), 95)
    }

    fn progress(pos: u64, length: u64) -> Result<StatusResponse, FetchError> {
        Ok(StatusResponse::Progress { pos, length })
    }

    fn unavailable() -> Result<StatusResponse, FetchError> {
        Ok(StatusResponse::Unavailable)
    }

    #[test]
    fn errors_before_progress_are_not_ready() {
        let mut s = session();
        assert!(matches!(s.observe(unavailable()), Step::NotReady));
        assert!(matches!(s.observe(unavailable()), Step::NotReady));
        assert_eq!(s.consecutive_not_ready(), 2);
        assert!(matches!(s.observe(progress(50, 100)), Step::Progress(50)));
        assert_eq!(s.old_percent(), 50);
        assert_eq!(s.consecutive_not_ready(), 0);
    }

    #[test]
    fn transport_failures_count_as_unavailable() {
        let mut s = session();
        assert!(matches!(s.observe(Err(FetchError::Http(404))), Step::NotReady));
        assert!(matches!(
            s.observe(Err(FetchError::Worker("gone".into()))),
            Step::NotReady
        ));
        assert!(matches!(s.observe(progress(97, 100)), Step::Progress(97)));
        assert!(matches!(s.observe(Err(FetchError::Http(500))), Step::Done));
    }

    #[test]
    fn error_above_tolerance_is_done() {
        let mut s = session();
        assert!(matches!(s.observe(progress(96, 100)), Step::Progress(96)));
        assert!(matches!(s.observe(unavailable()), Step::Done));
    }

    #[test]
    fn error_at_tolerance_is_still_not_ready() {
        let mut s = session();
        assert!(matches!(s.observe(progress(95, 100)), Step::Progress(95)));
        assert!(matches!(s.observe(unavailable()), Step::NotReady));
    }

    #[test]
    fn full_progress_is_done() {
        let mut s = session();
        assert!(matches!(s.observe(progress(10, 100)), Step::Progress(10)));
        assert!(matches!(s.observe(progress(100, 100)), Step::Done));
        assert_eq!(s.old_percent(), 100);
    }

    #[test]
    fn near_complete_never_regresses() {
        let mut s = session();
        assert!(matches!(s.observe(progress(97, 100)), Step::Progress(97)));
        assert!(matches!(s.observe(progress(40, 100)), Step::Progress(97)));
        assert_eq!(s.old_percent(), 97);
    }

    #[test]
    fn below_floor_may_go_backwards() {
        let mut s = session();
        assert!(matches!(s.observe(progress(60, 100)), Step::Progress(60)));
        assert!(matches!(s.observe(progress(30, 100)), Step::Progress(30)));
    }

    #[test]
    fn decode_error_is_broken() {
        let mut s = session();
        let r = Err(FetchError::Decode(DecodeError::MissingField("length")));
        assert!(matches!(s.observe(r), Step::Broken(DecodeError::MissingField("length"))));
    }

    #[test]
    fn oversized_body_after_tolerance_is_broken_not_done() {
        let mut s = session();
        assert!(matches!(s.observe(progress(97, 100)), Step::Progress(97)));
        let r = Err(FetchError::Decode(DecodeError::TooLarge { limit: 16 }));
        assert!(matches!(s.observe(r), Step::Broken(DecodeError::TooLarge { limit: 16 })));
    }

    #[test]
    fn zero_tolerance_treats_any_later_error_as_done() {
        let mut s = UploadSession::new("t".to_string(), "ok".to_string(), 0);
        assert!(matches!(s.observe(unavailable()), Step::NotReady));
        assert!(matches!(s.observe(progress(1, 100)), Step::Progress(1)));
        assert!(matches!(s.observe(unavailable()), Step::Done));
    }
}
