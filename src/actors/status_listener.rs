use actix::prelude::*;
use std::sync::Arc;

use crate::domain::order::OrderStatusListener;
use crate::messaging::RedpandaConsumer;

// ============================================================================
// Status Listener Actor - registers the relay against the processed queue
// ============================================================================

pub struct StatusListenerActor {
    consumer: Option<RedpandaConsumer>,
    listener: Arc<OrderStatusListener>,
}

impl StatusListenerActor {
    pub fn new(consumer: RedpandaConsumer, listener: Arc<OrderStatusListener>) -> Self {
        Self {
            consumer: Some(consumer),
            listener,
        }
    }
}

impl Actor for StatusListenerActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("StatusListenerActor started");

        // The consumer moves into the receive loop; dropping the loop on stop
        // closes the subscription.
        match self.consumer.take() {
            Some(consumer) => {
                ctx.spawn(consumer.run(self.listener.clone()).into_actor(self));
            }
            None => tracing::warn!("StatusListenerActor restarted without a consumer"),
        }
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("StatusListenerActor stopped");
    }
}
