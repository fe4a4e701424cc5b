#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    InvalidCronExpression { expr: String, reason: String },
}

impl std::fmt::Display for CronError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCronExpression { expr, reason } => {
                write!(f, "Invalid cron expression '{expr}': {reason}")
            }
        }
    }
}

impl std::error::Error for CronError {}
