/// What the client does with the first response it sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusClass {
    /// 401: try one refresh, then one retry.
    SessionExpired,
    /// Everything else goes back to the caller untouched.
    PassThrough,
}

pub(crate) fn classify_status(status_code: u16) -> StatusClass {
    match status_code {
        401 => StatusClass::SessionExpired,
        _ => StatusClass::PassThrough,
    }
}

pub(crate) fn refresh_succeeded(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_401_counts_as_session_expiry() {
        assert_eq!(classify_status(401), StatusClass::SessionExpired);
        for status in [200, 204, 400, 403, 404, 419, 429, 500, 503] {
            assert_eq!(classify_status(status), StatusClass::PassThrough, "{status}");
        }
    }

    #[test]
    fn refresh_requires_2xx() {
        assert!(refresh_succeeded(200));
        assert!(refresh_succeeded(204));
        assert!(!refresh_succeeded(302));
        assert!(!refresh_succeeded(401));
        assert!(!refresh_succeeded(403));
        assert!(!refresh_succeeded(500));
    }
}
