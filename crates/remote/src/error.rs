use thiserror::Error;

/// 远端协作方的失败。`Display` 即面向用户的提示字符串，
/// 按动作种类单独存入 UI 状态，从不向上抛裸异常对象。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// 服务端返回非 2xx，message 优先取响应体里的 error/message 字段。
    #[error("{message}")]
    Status { code: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
    /// 目标在远端不存在 (Demo 后端用它模拟 404)。
    #[error("comment not found")]
    NotFound,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}
