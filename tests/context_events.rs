use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use payments_hub::gateways::mock::{MockBehavior, MockGateway};
use payments_hub::{
    EventSink, GatewayRegistry, PaymentContext, PaymentError, PaymentEvent, PaymentGateway,
    PaymentManager, PaymentRequest, PaymentsConfig,
};

#[tokio::test]
async fn successful_execute_publishes_exactly_one_succeeded() {
    let (mut context, sink) = context_with_mock(MockBehavior::AlwaysSuccess);

    let response = context
        .using("mock")
        .with(request("ORD-1"))
        .execute()
        .await
        .unwrap();
    assert!(response.success);

    assert_eq!(sink.count("initiated"), 1);
    assert_eq!(sink.count("succeeded"), 1);
    assert_eq!(sink.count("failed"), 0);
}

#[tokio::test]
async fn declined_execute_publishes_exactly_one_failed() {
    let (mut context, sink) = context_with_mock(MockBehavior::AlwaysDecline);

    let response = context
        .using("mock")
        .with(request("ORD-2"))
        .execute()
        .await
        .unwrap();
    assert!(!response.success);

    assert_eq!(sink.count("succeeded"), 0);
    assert_eq!(sink.count("failed"), 1);
}

#[tokio::test]
async fn adapter_error_still_publishes_a_failed_event() {
    let (mut context, sink) = context_with_mock(MockBehavior::AlwaysError);

    let err = context
        .using("mock")
        .with(request("ORD-3"))
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::PaymentFailed { .. }));

    assert_eq!(sink.count("initiated"), 1);
    assert_eq!(sink.count("failed"), 1);
    assert_eq!(sink.count("succeeded"), 0);
}

#[tokio::test]
async fn execute_requires_gateway_and_request() {
    let (mut context, sink) = context_with_mock(MockBehavior::AlwaysSuccess);

    let err = context.execute().await.unwrap_err();
    assert!(matches!(err, PaymentError::ContextState(_)));

    let err = context.using("mock").execute().await.unwrap_err();
    assert!(matches!(err, PaymentError::ContextState(_)));

    // precondition failures publish nothing
    assert_eq!(sink.total(), 0);
}

#[tokio::test]
async fn execute_consumes_the_request() {
    let (mut context, _sink) = context_with_mock(MockBehavior::AlwaysSuccess);

    context.using("mock").with(request("ORD-4"));
    context.execute().await.unwrap();

    let err = context.execute().await.unwrap_err();
    assert!(matches!(err, PaymentError::ContextState(_)));
}

#[tokio::test]
async fn reset_supports_sequential_reuse() {
    let (mut context, sink) = context_with_mock(MockBehavior::AlwaysSuccess);

    context.using("mock").with(request("ORD-5"));
    context.execute().await.unwrap();

    context.reset();
    let err = context.refund("txn_1", amount("1.00")).await.unwrap_err();
    assert!(matches!(err, PaymentError::ContextState(_)));

    context.using("mock").with(request("ORD-6"));
    context.execute().await.unwrap();
    assert_eq!(sink.count("succeeded"), 2);
}

#[tokio::test]
async fn refund_publishes_refunded_event() {
    let registry = GatewayRegistry::new(PaymentsConfig::default());
    registry.register("mock", |settings| {
        Ok(Arc::new(
            MockGateway::from_settings("mock", &settings).with_refunds(None),
        ) as Arc<dyn PaymentGateway>)
    });
    let manager = Arc::new(PaymentManager::new(Arc::new(registry)));

    let sink = Arc::new(RecordingSink::default());
    let mut context = PaymentContext::new(manager);
    context.subscribe(sink.clone());

    context.using("mock");
    assert!(context.refund("txn_9", amount("5.00")).await.unwrap());
    assert_eq!(sink.count("refunded"), 1);
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingSink {
    fn count(&self, label: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|&&e| e == label)
            .count()
    }

    fn total(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &PaymentEvent) {
        let label = match event {
            PaymentEvent::Initiated { .. } => "initiated",
            PaymentEvent::Succeeded { .. } => "succeeded",
            PaymentEvent::Failed { .. } => "failed",
            PaymentEvent::Refunded { .. } => "refunded",
        };
        self.events.lock().unwrap().push(label);
    }
}

fn request(order_id: &str) -> PaymentRequest {
    PaymentRequest::new(
        order_id,
        amount("100.00"),
        "USD",
        "a@b.com",
        "https://example.com/cb",
    )
}

fn amount(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn context_with_mock(behavior: MockBehavior) -> (PaymentContext, Arc<RecordingSink>) {
    let registry = GatewayRegistry::new(PaymentsConfig::default());
    registry.register("mock", move |settings| {
        Ok(
            Arc::new(MockGateway::from_settings("mock", &settings).with_behavior(behavior))
                as Arc<dyn PaymentGateway>,
        )
    });
    let manager = Arc::new(PaymentManager::new(Arc::new(registry)));

    let sink = Arc::new(RecordingSink::default());
    let mut context = PaymentContext::new(manager);
    context.subscribe(sink.clone());
    (context, sink)
}
