//! Checkout workflow
//!
//! ```text
//!   Editing ──submit (valid)──▶ Submitting ──ok──▶ Completed(receipt)
//!      ▲                             │
//!      └──────── error banner ◀──────┘
//! ```
//!
//! Invalid submissions never leave `Editing` and never touch the network.
//! The cart is cleared only after a receipt has been built from a confirmed
//! response; on failure it is left exactly as it was.

use shared::models::{
    ApiOrder, CustomerPayload, OrderItemPayload, OrderMetadata, OrderPayload, PaymentMethod,
    Receipt, ShippingAddressPayload,
};
use shared::util::generate_receipt_code;

use crate::api::StorefrontApi;
use crate::cart::CartStore;
use crate::{ClientError, ClientResult};

/// Submission attempts per order when the backend reports a duplicate
/// receipt code (HTTP 409). Other failures are never retried.
pub const MAX_SUBMIT_ATTEMPTS: usize = 3;

/// Message used when the backend response carries no order.
pub const INVALID_ORDER_RESPONSE: &str = "Invalid response from server";

/// Customer input
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutForm {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub notes: String,
    pub payment_method: Option<PaymentMethod>,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact: String::new(),
            address: String::new(),
            notes: String::new(),
            payment_method: Some(PaymentMethod::default()),
        }
    }
}

impl CheckoutForm {
    /// Names of required inputs that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.contact.trim().is_empty() {
            missing.push("contact");
        }
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        if self.payment_method.is_none() {
            missing.push("payment method");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Cart non-empty and every required input present
    pub fn is_valid(&self, cart: &CartStore) -> bool {
        !cart.is_empty() && self.is_complete()
    }

    fn notes(&self) -> Option<String> {
        let notes = self.notes.trim();
        (!notes.is_empty()).then(|| notes.to_string())
    }

    fn to_payload(&self, cart: &CartStore, payment_method: PaymentMethod) -> OrderPayload {
        let receipt_code = generate_receipt_code();
        let name = self.name.trim().to_string();
        let contact = self.contact.trim().to_string();
        let address = self.address.trim().to_string();
        OrderPayload {
            order_number: receipt_code.clone(),
            receipt_code,
            customer: CustomerPayload {
                name: name.clone(),
                phone: contact.clone(),
            },
            shipping_address: ShippingAddressPayload {
                address: address.clone(),
            },
            customer_name: name,
            contact,
            address,
            notes: self.notes(),
            metadata: OrderMetadata { payment_method },
            items: cart.lines().iter().map(OrderItemPayload::from).collect(),
            discount: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutPhase {
    /// Form editable; `error` holds the last submission failure
    Editing { error: Option<String> },
    /// Request in flight, input locked
    Submitting,
    /// Order confirmed
    Completed(Box<Receipt>),
}

/// Result of a call to [`CheckoutWorkflow::submit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Form incomplete, cart empty or already completed; nothing sent
    Rejected,
    /// Receipt available, cart cleared
    Completed,
    /// Error banner set, cart untouched
    Failed,
}

#[derive(Debug)]
pub struct CheckoutWorkflow<A> {
    api: A,
    form: CheckoutForm,
    phase: CheckoutPhase,
}

impl<A: StorefrontApi> CheckoutWorkflow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            form: CheckoutForm::default(),
            phase: CheckoutPhase::Editing { error: None },
        }
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Mutable form access; `None` unless the workflow is editing.
    pub fn form_mut(&mut self) -> Option<&mut CheckoutForm> {
        match self.phase {
            CheckoutPhase::Editing { .. } => Some(&mut self.form),
            _ => None,
        }
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            CheckoutPhase::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match &self.phase {
            CheckoutPhase::Completed(receipt) => Some(&**receipt),
            _ => None,
        }
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self, cart: &CartStore) -> bool {
        !matches!(self.phase, CheckoutPhase::Completed(_)) && self.form.is_valid(cart)
    }

    /// Submit the order for the current cart.
    ///
    /// A submission abandoned mid-flight (future dropped) leaves the phase at
    /// `Submitting`; calling `submit` again starts a fresh attempt.
    pub async fn submit(&mut self, cart: &mut CartStore) -> SubmitOutcome {
        if !self.can_submit(cart) {
            tracing::debug!(
                cart_empty = cart.is_empty(),
                missing = ?self.form.missing_fields(),
                "Checkout submission rejected"
            );
            return SubmitOutcome::Rejected;
        }
        let Some(payment_method) = self.form.payment_method else {
            return SubmitOutcome::Rejected;
        };

        self.phase = CheckoutPhase::Submitting;
        let mut payload = self.form.to_payload(cart, payment_method);
        tracing::debug!(
            receipt_code = %payload.receipt_code,
            items = payload.items.len(),
            "Submitting order"
        );

        match self.send(&mut payload).await {
            Ok(order) => {
                let receipt = Receipt::from_order(&order, &payload);
                cart.clear_cart();
                tracing::info!(
                    order_id = %receipt.order_id,
                    receipt_code = %receipt.receipt_code,
                    grand_total = receipt.totals.grand_total,
                    "Order confirmed"
                );
                self.phase = CheckoutPhase::Completed(Box::new(receipt));
                SubmitOutcome::Completed
            }
            Err(e) => {
                tracing::error!(error = %e, "Order submission failed");
                self.phase = CheckoutPhase::Editing {
                    error: Some(e.user_message()),
                };
                SubmitOutcome::Failed
            }
        }
    }

    async fn send(&self, payload: &mut OrderPayload) -> ClientResult<ApiOrder> {
        let mut attempt = 1;
        let response = loop {
            match self.api.submit_order(payload).await {
                Err(e) if e.is_conflict() && attempt < MAX_SUBMIT_ATTEMPTS => {
                    let previous = std::mem::take(&mut payload.receipt_code);
                    payload.set_receipt_code(generate_receipt_code());
                    tracing::warn!(
                        attempt,
                        %previous,
                        next = %payload.receipt_code,
                        "Receipt code rejected as duplicate, retrying"
                    );
                    attempt += 1;
                }
                other => break other?,
            }
        };
        ApiOrder::from_response(&response)
            .ok_or_else(|| ClientError::InvalidResponse(INVALID_ORDER_RESPONSE.to_string()))
    }

    /// Leave the receipt view and start a new order with a blank form.
    pub fn reset(&mut self) {
        self.form = CheckoutForm::default();
        self.phase = CheckoutPhase::Editing { error: None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Product, PublishStatus};

    fn filled() -> CheckoutForm {
        CheckoutForm {
            name: "Ama".into(),
            contact: "070123456".into(),
            address: "12 Main Rd".into(),
            notes: String::new(),
            payment_method: Some(PaymentMethod::Cash),
        }
    }

    fn cart_with_line() -> CartStore {
        let mut cart = CartStore::new();
        cart.add_to_cart(&Product {
            id: "p1".into(),
            name: "Serum".into(),
            description: String::new(),
            price: 100.0,
            image: Some("https://img.example.com/serum.png".into()),
            category: "Serums".into(),
            product_id: Some("SKU-1".into()),
            expiring_date: None,
            publish_status: Some(PublishStatus::Yes),
        });
        cart
    }

    #[test]
    fn test_default_form_selects_cash() {
        let form = CheckoutForm::default();
        assert_eq!(form.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(form.missing_fields(), ["name", "contact", "address"]);
    }

    #[test]
    fn test_form_validity() {
        let cart = cart_with_line();
        assert!(filled().is_valid(&cart));
        assert!(!filled().is_valid(&CartStore::new()));

        let blank_cases: [fn(&mut CheckoutForm); 4] = [
            |f| f.name = "  ".into(),
            |f| f.contact.clear(),
            |f| f.address.clear(),
            |f| f.payment_method = None,
        ];
        for blank in blank_cases {
            let mut form = filled();
            blank(&mut form);
            assert!(!form.is_valid(&cart));
        }
    }

    #[test]
    fn test_payload_from_form_and_cart() {
        let mut cart = cart_with_line();
        cart.update_quantity("p1", 2);
        let mut form = filled();
        form.name = "  Ama  ".into();
        form.notes = " Ring twice ".into();

        let payload = form.to_payload(&cart, PaymentMethod::AfriMoney);
        assert_eq!(payload.receipt_code, payload.order_number);
        assert!(shared::util::is_receipt_code(&payload.receipt_code));
        assert_eq!(payload.customer_name, "Ama");
        assert_eq!(payload.customer.phone, "070123456");
        assert_eq!(payload.notes.as_deref(), Some("Ring twice"));
        assert_eq!(payload.metadata.payment_method, PaymentMethod::AfriMoney);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].product_id, "SKU-1");
        assert_eq!(payload.items[0].total, 200.0);
        assert_eq!(payload.discount, 0.0);
    }
}
