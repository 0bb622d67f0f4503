//! 批次临时目录
//!
//! 一个批次独占一个目录，目录随所有者一起删除

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

/// 单个批次的临时工作目录
///
/// 正常结束时调用 [`ScratchSpace::close`]，出错提前返回时由 Drop 清理
#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
}

impl ScratchSpace {
    /// 在 `root` 下创建目录，`root` 为 None 时使用系统临时目录
    pub fn create(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("exam-forge-");
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        debug!("创建临时目录: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 生成目录内不重复的文件路径（不创建文件）
    pub fn unique_path(&self, prefix: &str, extension: &str) -> PathBuf {
        self.dir
            .path()
            .join(format!("{}-{}.{}", prefix, uuid::Uuid::new_v4(), extension))
    }

    /// 删除目录，失败只记录日志
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("已清理临时目录: {}", path.display()),
            Err(e) => warn!("清理临时目录失败 {}: {}", path.display(), e),
        }
    }
}
