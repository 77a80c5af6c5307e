//! Order Model
//!
//! Request payload for `POST /api/orders` and the loosely-typed order object
//! the backend sends back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart::CartLine;
use crate::util::{
    deserialize_lenient, deserialize_lenient_id, deserialize_lenient_list,
    deserialize_lenient_number, deserialize_lenient_quantity, deserialize_lenient_string,
};

/// How the customer settles the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    OrangeMoney,
    AfriMoney,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::OrangeMoney, Self::AfriMoney];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::OrangeMoney => "orange-money",
            Self::AfriMoney => "afri-money",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::OrangeMoney => "Orange Money",
            Self::AfriMoney => "AfriMoney",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Cash => "Pay with cash when your order arrives.",
            Self::OrangeMoney => {
                "Send the transfer before dispatch. Instructions will appear below."
            }
            Self::AfriMoney => "Pay via AfriMoney before we send out your parcel.",
        }
    }

    /// Manual transfer instructions; `None` for cash.
    pub fn transfer_instructions(&self) -> Option<&'static str> {
        match self {
            Self::Cash => None,
            Self::OrangeMoney => Some(
                "Open your Orange Money app or dial *144#. Send the total amount to \
                 079-000-111 (FantyFresh). Add your name in the reference.",
            ),
            Self::AfriMoney => Some(
                "Dial *161# or use your AfriMoney app. Transfer the total to \
                 088-222-555 (FantyFresh). Use your order ID as the reference.",
            ),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown payment method string
#[derive(Debug, Clone, Error)]
#[error("unknown payment method '{0}' (expected cash, orange-money or afri-money)")]
pub struct ParsePaymentMethodError(pub String);

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "orange-money" => Ok(Self::OrangeMoney),
            "afri-money" => Ok(Self::AfriMoney),
            _ => Err(ParsePaymentMethodError(s.to_string())),
        }
    }
}

/// Order line as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price in currency unit
    pub price: f64,
    /// `price × quantity`
    pub total: f64,
    pub image: Option<String>,
}

impl From<&CartLine> for OrderItemPayload {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.order_product_id().to_string(),
            name: line.product.name.clone(),
            quantity: line.quantity,
            price: line.product.price,
            total: line.line_total(),
            image: line.product.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddressPayload {
    pub address: String,
}

/// Free-form order metadata; the backend has no first-class payment field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadata {
    pub payment_method: PaymentMethod,
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub receipt_code: String,
    /// Same value as `receipt_code`
    pub order_number: String,
    pub customer_name: String,
    pub contact: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub customer: CustomerPayload,
    pub shipping_address: ShippingAddressPayload,
    pub metadata: OrderMetadata,
    pub items: Vec<OrderItemPayload>,
    /// Always 0 for storefront orders
    pub discount: f64,
}

impl OrderPayload {
    /// Replace the receipt code (and the mirrored order number).
    pub fn set_receipt_code(&mut self, code: impl Into<String>) {
        let code = code.into();
        self.order_number = code.clone();
        self.receipt_code = code;
    }

    /// Σ item totals
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(|item| item.total).sum()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiCustomer {
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiShippingAddress {
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub address: Option<String>,
}

/// Order line as echoed by the backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiOrderItem {
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_quantity")]
    pub quantity: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient_number")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_number")]
    pub total: Option<f64>,
}

/// Order object returned by `POST /api/orders`, either under `order` or at
/// the top level of the response
///
/// Only the id matters for accepting the order; every other field that is
/// missing or of the wrong type is `None` and filled from local data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiOrder {
    #[serde(deserialize_with = "deserialize_lenient_id")]
    pub id: Option<String>,
    #[serde(rename = "_id", deserialize_with = "deserialize_lenient_id")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub receipt_code: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub customer: Option<ApiCustomer>,
    #[serde(deserialize_with = "deserialize_lenient")]
    pub shipping_address: Option<ApiShippingAddress>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_number")]
    pub subtotal: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_number")]
    pub total: Option<f64>,
    /// Entries that are not objects are skipped
    #[serde(deserialize_with = "deserialize_lenient_list")]
    pub items: Option<Vec<ApiOrderItem>>,
}

impl ApiOrder {
    /// Extract the order from a raw response body.
    ///
    /// Returns `None` when neither `order` nor the top level is an object
    /// carrying an `id`/`_id`.
    pub fn from_response(response: &serde_json::Value) -> Option<Self> {
        let candidate = match response.get("order") {
            Some(order) if order.is_object() => order,
            _ => response,
        };
        if !candidate.is_object() {
            return None;
        }
        let order: ApiOrder = match serde_json::from_value(candidate.clone()) {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(error = %e, "Order response did not match the expected shape");
                return None;
            }
        };
        order.order_id().is_some().then_some(order)
    }

    /// Backend-issued order id (`id`, else `_id`)
    pub fn order_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.mongo_id.as_deref().filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> OrderPayload {
        OrderPayload {
            receipt_code: "ABC234".into(),
            order_number: "ABC234".into(),
            customer_name: "Ama".into(),
            contact: "+232 70 123456".into(),
            address: "12 Main Rd".into(),
            notes: None,
            customer: CustomerPayload {
                name: "Ama".into(),
                phone: "+232 70 123456".into(),
            },
            shipping_address: ShippingAddressPayload {
                address: "12 Main Rd".into(),
            },
            metadata: OrderMetadata {
                payment_method: PaymentMethod::OrangeMoney,
            },
            items: vec![OrderItemPayload {
                product_id: "p1".into(),
                name: "Serum".into(),
                quantity: 2,
                price: 100.0,
                total: 200.0,
                image: None,
            }],
            discount: 0.0,
        }
    }

    #[test]
    fn test_payment_method_parse_and_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
        assert_eq!(" Orange-Money ".parse::<PaymentMethod>().unwrap(), PaymentMethod::OrangeMoney);
        assert!("card".parse::<PaymentMethod>().is_err());
        assert!(PaymentMethod::Cash.transfer_instructions().is_none());
        assert!(PaymentMethod::AfriMoney.transfer_instructions().is_some());
    }

    #[test]
    fn test_payload_wire_format() {
        let value = serde_json::to_value(payload()).unwrap();
        assert_eq!(value["receiptCode"], "ABC234");
        assert_eq!(value["orderNumber"], "ABC234");
        assert_eq!(value["metadata"]["paymentMethod"], "orange-money");
        assert_eq!(value["shippingAddress"]["address"], "12 Main Rd");
        assert_eq!(value["items"][0]["productId"], "p1");
        assert_eq!(value["discount"], 0.0);
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_set_receipt_code_mirrors_order_number() {
        let mut p = payload();
        p.set_receipt_code("XYZ789");
        assert_eq!(p.receipt_code, "XYZ789");
        assert_eq!(p.order_number, "XYZ789");
        assert_eq!(p.subtotal(), 200.0);
    }

    #[test]
    fn test_order_from_nested_response() {
        let response = json!({"order": {"_id": "o-1", "total": "250", "receiptCode": "QWE234"}});
        let order = ApiOrder::from_response(&response).unwrap();
        assert_eq!(order.order_id(), Some("o-1"));
        assert_eq!(order.total, Some(250.0));
        assert_eq!(order.receipt_code.as_deref(), Some("QWE234"));
    }

    #[test]
    fn test_order_from_top_level_response() {
        let response = json!({"id": "o-2", "createdAt": "2026-01-01T00:00:00Z"});
        let order = ApiOrder::from_response(&response).unwrap();
        assert_eq!(order.order_id(), Some("o-2"));
    }

    #[test]
    fn test_order_missing_id_is_rejected() {
        assert!(ApiOrder::from_response(&json!({"success": true})).is_none());
        assert!(ApiOrder::from_response(&json!(null)).is_none());
        assert!(ApiOrder::from_response(&json!("ok")).is_none());
        assert!(ApiOrder::from_response(&json!({"order": {"id": ""}})).is_none());
    }

    #[test]
    fn test_order_with_numeric_id() {
        let order = ApiOrder::from_response(&json!({"order": {"id": 17, "total": 200}})).unwrap();
        assert_eq!(order.order_id(), Some("17"));
        assert_eq!(order.total, Some(200.0));
    }

    #[test]
    fn test_order_with_mistyped_fields_is_accepted() {
        let response = json!({
            "order": {
                "_id": "665f",
                "customer": "64ab00ff",
                "shippingAddress": ["12 Main Rd"],
                "createdAt": 1717171717,
                "receiptCode": null,
                "notes": {"text": "x"},
                "items": [{"name": "Serum", "quantity": 2, "price": 100}, "64ab0100", 7]
            }
        });
        let order = ApiOrder::from_response(&response).unwrap();
        assert_eq!(order.order_id(), Some("665f"));
        assert!(order.customer.is_none());
        assert!(order.shipping_address.is_none());
        assert!(order.created_at.is_none());
        assert!(order.receipt_code.is_none());
        assert!(order.notes.is_none());
        let items = order.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, Some(2));
    }
}
