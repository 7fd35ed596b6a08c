use thiserror::Error;

/// 定价服务错误
#[derive(Debug, Error)]
pub enum PricingError {
    /// 输入校验失败（负毛利、负价格、零件数等），调用方应保留原状态
    #[error("validation error: {0}")]
    Validation(String),

    #[error("pricing template {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
