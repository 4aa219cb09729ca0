use std::fmt;
use std::str::FromStr;

/// Longest name a record field may hold, in characters.
pub const MAX_FIELD_LEN: usize = 99;

/// Default upper bound on records held by one table (active + deleted).
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Outcome of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestResult {
    Failed,
    Passed,
    Pending,
    Success,
}

impl TestResult {
    pub const ALL: [TestResult; 4] = [
        TestResult::Failed,
        TestResult::Passed,
        TestResult::Pending,
        TestResult::Success,
    ];

    /// Canonical token, as written to disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestResult::Failed => "Failed",
            TestResult::Passed => "Passed",
            TestResult::Pending => "Pending",
            TestResult::Success => "Success",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marker for text that names none of the four results.
///
/// Callers decide what it means: building a record treats it as a
/// validation failure, loading a file degrades it to `Pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResult(pub String);

impl fmt::Display for InvalidResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a test result (expected Failed, Passed, Pending or Success)",
            self.0
        )
    }
}

impl std::error::Error for InvalidResult {}

impl FromStr for TestResult {
    type Err = InvalidResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        TestResult::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| InvalidResult(token.to_string()))
    }
}

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub system_name: String,
    pub test_type: String,
    pub result: TestResult,
    /// `false` once soft-deleted.
    pub active: bool,
}

impl Record {
    pub fn new(id: u32, system_name: String, test_type: String, result: TestResult) -> Self {
        Self {
            id,
            system_name,
            test_type,
            result,
            active: true,
        }
    }

    /// Case-insensitive substring match over the searchable fields.
    /// `needle` must already be lowercase.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.id.to_string().contains(needle)
            || self.system_name.to_lowercase().contains(needle)
            || self.test_type.to_lowercase().contains(needle)
            || self.result.as_str().to_lowercase().contains(needle)
    }
}
