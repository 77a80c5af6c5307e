//! Receipt Model
//!
//! Client-side summary of a confirmed order. Built once from the submission
//! response, with every missing field filled from locally known data.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::{ApiOrder, OrderPayload, PaymentMethod};
use crate::util::{finite_or_zero, format_currency, now_rfc3339};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptCustomer {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    pub subtotal: f64,
    pub grand_total: f64,
}

/// Read-only view of a confirmed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub receipt_code: String,
    pub order_id: String,
    pub placed_at: String,
    pub payment_method: PaymentMethod,
    pub customer: ReceiptCustomer,
    pub items: Vec<ReceiptItem>,
    pub totals: ReceiptTotals,
}

impl Receipt {
    /// Build a receipt from the confirmed order, field by field preferring
    /// the backend's values over the submitted payload.
    pub fn from_order(order: &ApiOrder, submitted: &OrderPayload) -> Self {
        let local_subtotal = submitted.subtotal();
        let (api_customer, api_address) = (order.customer.as_ref(), order.shipping_address.as_ref());

        let customer = ReceiptCustomer {
            name: api_customer
                .and_then(|c| non_empty(c.name.as_deref()))
                .unwrap_or(submitted.customer_name.as_str())
                .to_string(),
            contact: api_customer
                .and_then(|c| non_empty(c.phone.as_deref()))
                .unwrap_or(submitted.contact.as_str())
                .to_string(),
            address: api_address
                .and_then(|a| non_empty(a.address.as_deref()))
                .unwrap_or(submitted.address.as_str())
                .to_string(),
            notes: non_empty(order.notes.as_deref())
                .map(str::to_string)
                .or_else(|| submitted.notes.clone()),
        };

        let items = match &order.items {
            Some(items) if !items.is_empty() => items
                .iter()
                .map(|item| {
                    let quantity = item.quantity.unwrap_or(0);
                    let price = item.price.map(finite_or_zero).unwrap_or(0.0);
                    ReceiptItem {
                        name: item.name.clone().unwrap_or_default(),
                        quantity,
                        price,
                        total: item
                            .total
                            .map(finite_or_zero)
                            .unwrap_or(price * f64::from(quantity)),
                    }
                })
                .collect(),
            _ => submitted
                .items
                .iter()
                .map(|item| ReceiptItem {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    total: item.price * f64::from(item.quantity),
                })
                .collect(),
        };

        Self {
            receipt_code: non_empty(order.receipt_code.as_deref())
                .unwrap_or(submitted.receipt_code.as_str())
                .to_string(),
            order_id: order.order_id().unwrap_or_default().to_string(),
            placed_at: non_empty(order.created_at.as_deref())
                .map(str::to_string)
                .unwrap_or_else(now_rfc3339),
            payment_method: submitted.metadata.payment_method,
            customer,
            items,
            totals: ReceiptTotals {
                subtotal: order.subtotal.map(finite_or_zero).unwrap_or(local_subtotal),
                grand_total: order.total.map(finite_or_zero).unwrap_or(local_subtotal),
            },
        }
    }

    /// `placed_at` in local display form, or the raw string if unparseable.
    pub fn placed_at_display(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.placed_at)
            .map(|dt| {
                dt.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|_| self.placed_at.clone())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order confirmed")?;
        writeln!(f, "Receipt #{}", self.receipt_code)?;
        writeln!(f)?;
        writeln!(f, "Customer:         {}", self.customer.name)?;
        writeln!(f, "                  {}", self.customer.contact)?;
        writeln!(f, "Delivery address: {}", self.customer.address)?;
        writeln!(f, "Order ID:         {}", self.order_id)?;
        writeln!(f, "Order date:       {}", self.placed_at_display())?;
        if let Some(notes) = self.customer.notes.as_deref().filter(|n| !n.is_empty()) {
            writeln!(f, "Notes:            {notes}")?;
        }
        writeln!(f)?;
        writeln!(f, "Items")?;
        for item in &self.items {
            writeln!(
                f,
                "  {:<28} Qty {} x {:>12}  {:>12}",
                item.name,
                item.quantity,
                format_currency(item.price),
                format_currency(item.total)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Payment method:   {}", self.payment_method.title())?;
        write!(f, "Grand total:      {}", format_currency(self.totals.grand_total))
    }
}
