use serde::{Deserialize, Serialize};

/// How the import summary panel should be presented.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum SummaryStatus {
    InProgress,
    Successful,
    PartiallyFailed,
    Failed,
}

impl SummaryStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "Processing",
            Self::Successful => "Finished",
            Self::PartiallyFailed => "Finished with errors",
            Self::Failed => "Failed",
        }
    }
}
