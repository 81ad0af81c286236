mod drivers;
mod error;
mod traits;

pub use drivers::demo::DemoBackend;
pub use drivers::http::{HttpBackend, HttpConfig};
pub use error::RemoteError;
pub use traits::{Backend, CommentWriter, LikeDelta, PostReader, PostWithComments};

use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub enum BackendConfig {
    Http(HttpConfig),
    /// 离线/演示模式：全内存，初始化时一次性选定。
    Demo,
}

/// 按配置选定驱动。之后所有读写都走同一个 `Backend` 句柄。
pub fn connect(config: BackendConfig) -> Arc<dyn Backend> {
    match config {
        BackendConfig::Http(http_conf) => {
            info!("Initializing backend in HTTP mode: {}", http_conf.base_url);
            Arc::new(HttpBackend::new(http_conf))
        }
        BackendConfig::Demo => {
            info!("Initializing backend in DEMO mode (in-memory)...");
            Arc::new(DemoBackend::new())
        }
    }
}
