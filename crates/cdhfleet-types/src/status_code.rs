/// Numeric status code type used across the workspace.
#[allow(non_camel_case_types)]
pub type status_code_t = u16;

/// Common status codes (0-999).
pub mod StatusCode {
    use super::status_code_t;

    pub const OK: status_code_t = 0;
    pub const NOT_IMPLEMENTED: status_code_t = 1;
    pub const INVALID_ARG: status_code_t = 2;
    pub const INVALID_CONFIG: status_code_t = 3;
    pub const CONFIG_PARSE_ERROR: status_code_t = 4;
    pub const INVALID_FORMAT: status_code_t = 5;
    pub const INTERRUPTED: status_code_t = 6;
    pub const IO_ERROR: status_code_t = 7;
    pub const OS_ERROR: status_code_t = 8;
    pub const UNKNOWN: status_code_t = 999;
}

/// Manager / roster status codes (1xxx).
pub mod MgmtCode {
    use super::status_code_t;

    pub const ROSTER_UNAVAILABLE: status_code_t = 1000;
    pub const NO_MANAGER_CONFIGURED: status_code_t = 1001;
    pub const HOST_NOT_FOUND: status_code_t = 1002;
    pub const DUPLICATE_HOST: status_code_t = 1003;
}

/// Liveness poller status codes (2xxx).
pub mod PollCode {
    use super::status_code_t;

    pub const TICK_FAILED: status_code_t = 2000;
    pub const ALREADY_RUNNING: status_code_t = 2001;
    pub const NOT_RUNNING: status_code_t = 2002;
}

/// Metrics collector status codes (3xxx).
pub mod CollectCode {
    use super::status_code_t;

    pub const BASE_DIR_CREATE_FAILED: status_code_t = 3000;
    pub const ARCHIVE_DIR_CREATE_FAILED: status_code_t = 3001;
    pub const NODE_DIR_CREATE_FAILED: status_code_t = 3002;
    pub const FETCH_FAILED: status_code_t = 3003;
    pub const FETCH_TIMEOUT: status_code_t = 3004;
    pub const DEADLINE_EXCEEDED: status_code_t = 3005;
    pub const REPORT_WRITE_FAILED: status_code_t = 3006;
}

/// Classification of status code ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum StatusCodeType {
    Invalid = -1,
    Common = 0,
    Mgmt = 1,
    Poll = 2,
    Collect = 3,
}

/// Determine the type/category of a status code.
pub fn type_of(code: status_code_t) -> StatusCodeType {
    match code {
        0..=999 => StatusCodeType::Common,
        1000..=1999 => StatusCodeType::Mgmt,
        2000..=2999 => StatusCodeType::Poll,
        3000..=3999 => StatusCodeType::Collect,
        _ => StatusCodeType::Invalid,
    }
}

/// Convert a status code to its human-readable name.
pub fn to_string(code: status_code_t) -> &'static str {
    match code {
        // Common
        StatusCode::OK => "OK",
        StatusCode::NOT_IMPLEMENTED => "NotImplemented",
        StatusCode::INVALID_ARG => "InvalidArg",
        StatusCode::INVALID_CONFIG => "InvalidConfig",
        StatusCode::CONFIG_PARSE_ERROR => "ConfigParseError",
        StatusCode::INVALID_FORMAT => "InvalidFormat",
        StatusCode::INTERRUPTED => "Interrupted",
        StatusCode::IO_ERROR => "IOError",
        StatusCode::OS_ERROR => "OSError",
        StatusCode::UNKNOWN => "Unknown",

        // Mgmt
        MgmtCode::ROSTER_UNAVAILABLE => "Mgmt::RosterUnavailable",
        MgmtCode::NO_MANAGER_CONFIGURED => "Mgmt::NoManagerConfigured",
        MgmtCode::HOST_NOT_FOUND => "Mgmt::HostNotFound",
        MgmtCode::DUPLICATE_HOST => "Mgmt::DuplicateHost",

        // Poll
        PollCode::TICK_FAILED => "Poll::TickFailed",
        PollCode::ALREADY_RUNNING => "Poll::AlreadyRunning",
        PollCode::NOT_RUNNING => "Poll::NotRunning",

        // Collect
        CollectCode::BASE_DIR_CREATE_FAILED => "Collect::BaseDirCreateFailed",
        CollectCode::ARCHIVE_DIR_CREATE_FAILED => "Collect::ArchiveDirCreateFailed",
        CollectCode::NODE_DIR_CREATE_FAILED => "Collect::NodeDirCreateFailed",
        CollectCode::FETCH_FAILED => "Collect::FetchFailed",
        CollectCode::FETCH_TIMEOUT => "Collect::FetchTimeout",
        CollectCode::DEADLINE_EXCEEDED => "Collect::DeadlineExceeded",
        CollectCode::REPORT_WRITE_FAILED => "Collect::ReportWriteFailed",

        _ => "Invalid",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of_ranges() {
        assert_eq!(type_of(StatusCode::OK), StatusCodeType::Common);
        assert_eq!(type_of(MgmtCode::ROSTER_UNAVAILABLE), StatusCodeType::Mgmt);
        assert_eq!(type_of(PollCode::TICK_FAILED), StatusCodeType::Poll);
        assert_eq!(type_of(CollectCode::FETCH_FAILED), StatusCodeType::Collect);
        assert_eq!(type_of(9000), StatusCodeType::Invalid);
    }

    #[test]
    fn test_to_string_known_codes() {
        assert_eq!(to_string(StatusCode::OK), "OK");
        assert_eq!(to_string(MgmtCode::NO_MANAGER_CONFIGURED), "Mgmt::NoManagerConfigured");
        assert_eq!(to_string(CollectCode::FETCH_TIMEOUT), "Collect::FetchTimeout");
    }

    #[test]
    fn test_to_string_unknown_code() {
        assert_eq!(to_string(12345), "Invalid");
    }
}
