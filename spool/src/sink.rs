use async_trait::async_trait;

use crate::job::Page;

/// Processing seam for drained pages.
///
/// The consumer task hands every page it dequeues to the sink, in FIFO
/// order. A sink error is fatal to that job only; other jobs keep running.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn process(&self, page: &Page) -> anyhow::Result<()>;
}

/// Default sink: logs each page as a structured tracing event.
///
/// The log line is a pure side effect, not part of the coordination
/// contract; swap in any other sink without touching the runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl PageSink for TracingSink {
    async fn process(&self, page: &Page) -> anyhow::Result<()> {
        tracing::info!(
            job = %page.job,
            page = page.index,
            label = %page.label,
            "background page message"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobId;

    #[tokio::test]
    async fn test_tracing_sink_accepts_pages() {
        let sink = TracingSink;
        sink.process(&Page::new(JobId(1), 0)).await.unwrap();
    }
}
