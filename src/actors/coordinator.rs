use actix::prelude::*;
use std::sync::Arc;

use crate::domain::order::OrderStatusListener;
use crate::import::ProductImport;
use crate::messaging::RedpandaConsumer;
use super::{FileImportActor, StatusListenerActor};

// ============================================================================
// Coordinator Actor - owns the background workers
// ============================================================================
//
// Actor Hierarchy:
//   CoordinatorActor
//   ├── StatusListenerActor  (processed.order.queue → client channel)
//   └── FileImportActor      (directory poller, optional)
//
// ============================================================================

pub struct CoordinatorActor {
    import: Option<Arc<ProductImport>>,
    consumer: Option<RedpandaConsumer>,
    listener: Arc<OrderStatusListener>,
    file_import: Option<Addr<FileImportActor>>,
    status_listener: Option<Addr<StatusListenerActor>>,
}

impl CoordinatorActor {
    pub fn new(
        import: Option<Arc<ProductImport>>,
        consumer: RedpandaConsumer,
        listener: Arc<OrderStatusListener>,
    ) -> Self {
        Self {
            import,
            consumer: Some(consumer),
            listener,
            file_import: None,
            status_listener: None,
        }
    }

    fn start_child_actors(&mut self, _ctx: &mut Context<Self>) {
        tracing::info!("Starting child actors");

        if let Some(consumer) = self.consumer.take() {
            let status_listener = StatusListenerActor::new(consumer, self.listener.clone()).start();
            self.status_listener = Some(status_listener);
        }

        match self.import.clone() {
            Some(pipeline) => {
                self.file_import = Some(FileImportActor::new(pipeline).start());
            }
            None => tracing::info!("File import disabled"),
        }

        tracing::info!("✅ All child actors started");
    }
}

impl Actor for CoordinatorActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("🎯 CoordinatorActor started");
        self.start_child_actors(ctx);
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("🛑 CoordinatorActor stopped");
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

impl Handler<Shutdown> for CoordinatorActor {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        tracing::info!("Received shutdown signal");

        if let Some(ref status_listener) = self.status_listener {
            status_listener.do_send(StopActor);
        }

        if let Some(ref file_import) = self.file_import {
            file_import.do_send(StopActor);
        }

        ctx.stop();
    }
}

/// Message to gracefully stop a child actor
#[derive(Message)]
#[rtype(result = "()")]
struct StopActor;

impl Handler<StopActor> for StatusListenerActor {
    type Result = ();

    fn handle(&mut self, _: StopActor, ctx: &mut Self::Context) {
        tracing::info!("StatusListenerActor received stop signal");
        ctx.stop();
    }
}

impl Handler<StopActor> for FileImportActor {
    type Result = ();

    fn handle(&mut self, _: StopActor, ctx: &mut Self::Context) {
        tracing::info!("FileImportActor received stop signal");
        ctx.stop();
    }
}
