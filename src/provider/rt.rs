use once_cell::sync::OnceCell;
use std::future::Future;
use tokio::runtime::{self, Handle, Runtime, RuntimeFlavor};

use super::ProviderError;

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

fn runtime() -> Result<&'static Runtime, ProviderError> {
    RUNTIME.get_or_try_init(|| {
        runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("awscfg-rt")
            .build()
            .map_err(|e| ProviderError::InvalidConfig(format!("创建 runtime 失败: {}", e)))
    })
}

/// 在同步代码中执行异步调用
///
/// 远程调用始终在进程内共享的 runtime 上执行，SDK 客户端及其连接池
/// 与该 runtime 绑定，不受调用方 runtime 生命周期影响。
///
/// - 不在 runtime 中：直接在共享 runtime 上阻塞
/// - 在 runtime 中：不能在当前线程上再启动 runtime，转到独立线程执行；
///   多线程 runtime 先 `block_in_place`，避免占住工作线程
pub(crate) fn block_on<F>(fut: F) -> Result<F::Output, ProviderError>
where
    F: Future + Send,
    F::Output: Send,
{
    let rt = runtime()?;
    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => return Ok(rt.block_on(fut)),
    };

    let run_on_shared = || {
        std::thread::scope(|s| {
            s.spawn(|| rt.block_on(fut))
                .join()
                .map_err(|_| ProviderError::InvalidConfig("runtime 线程异常退出".to_string()))
        })
    };
    match handle.runtime_flavor() {
        RuntimeFlavor::MultiThread => tokio::task::block_in_place(run_on_shared),
        _ => run_on_shared(),
    }
}
