use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Sender, Receiver};
use tokio::sync::oneshot;
use tokio::time::{self, Duration};
use tokio::task;
use tracing_appender::rolling;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;

use crate::logging::translation_log::TranslationLog;

enum LogCommand {
    Entry(String),
    Flush(oneshot::Sender<()>),
}

/// 审计日志管理器：异步批量写入 JSON lines，按小时滚动
pub struct AuditLogger {
    sender: Sender<LogCommand>,
}

impl AuditLogger {
    /// - `log_dir`: 日志文件存放目录
    /// - `buffer_size`: mpsc 通道缓冲区大小
    /// - `batch_size`: 批量写入的日志条数
    /// - `flush_interval`: 定时刷新日志的时间间隔（毫秒）
    pub fn new(log_dir: &str, buffer_size: usize, batch_size: usize, flush_interval: u64) -> Arc<Self> {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let log_file = Arc::new(rolling::hourly(log_dir, "translation_log.json"));

        tokio::spawn(Self::background_log_writer(log_file, receiver, batch_size, flush_interval));

        Arc::new(Self { sender })
    }

    /// 记录一条转换日志
    pub async fn log(&self, entry: &TranslationLog) {
        let line = match serde_json::to_string(entry) {
            Ok(line) => line,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize translation log");
                return;
            }
        };
        if let Err(e) = self.sender.send(LogCommand::Entry(line)).await {
            tracing::error!(error = %e, "failed to send translation log");
        }
    }

    /// 将缓冲区中的日志立即写盘，并等待写入完成
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(LogCommand::Flush(done)).await.is_ok() {
            let _ = wait.await;
        }
    }

    async fn background_log_writer(
        log_file: Arc<RollingFileAppender>,
        mut receiver: Receiver<LogCommand>,
        batch_size: usize,
        flush_interval: u64,
    ) {
        let mut buffer = Vec::new();
        let mut interval = time::interval(Duration::from_millis(flush_interval));

        loop {
            tokio::select! {
                command = receiver.recv() => match command {
                    Some(LogCommand::Entry(line)) => {
                        buffer.push(line);
                        if buffer.len() >= batch_size {
                            Self::write_logs_to_disk(log_file.clone(), &mut buffer).await;
                        }
                    }
                    Some(LogCommand::Flush(done)) => {
                        Self::write_logs_to_disk(log_file.clone(), &mut buffer).await;
                        let _ = done.send(());
                    }
                    None => {
                        Self::write_logs_to_disk(log_file.clone(), &mut buffer).await;
                        break;
                    }
                },
                _ = interval.tick() => {
                    Self::write_logs_to_disk(log_file.clone(), &mut buffer).await;
                }
            }
        }
    }

    async fn write_logs_to_disk(file: Arc<RollingFileAppender>, buffer: &mut Vec<String>) {
        if buffer.is_empty() {
            return;
        }
        let content = buffer.join("\n") + "\n";
        buffer.clear();

        let result = task::spawn_blocking(move || {
            let mut writer = file.make_writer();
            writer.write_all(content.as_bytes())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "failed to write translation logs"),
            Err(e) => tracing::error!(error = %e, "translation log writer task failed"),
        }
    }
}
