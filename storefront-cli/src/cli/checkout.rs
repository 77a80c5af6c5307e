use anyhow::bail;
use clap::Args;
use storefront_client::{CheckoutWorkflow, PaymentMethod, SubmitOutcome};

use super::Context;
use super::cart::print_cart;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Phone number or email
    #[arg(long)]
    contact: String,

    /// Delivery address
    #[arg(long)]
    address: String,

    /// Delivery notes
    #[arg(long, default_value = "")]
    notes: String,

    /// cash, orange-money or afri-money
    #[arg(long, default_value_t = PaymentMethod::Cash)]
    payment: PaymentMethod,
}

pub(crate) async fn run(ctx: &Context, args: CheckoutArgs) -> anyhow::Result<()> {
    let mut cart = ctx.cart();
    let mut workflow = CheckoutWorkflow::new(ctx.client()?);
    if let Some(form) = workflow.form_mut() {
        form.name = args.name;
        form.contact = args.contact;
        form.address = args.address;
        form.notes = args.notes;
        form.payment_method = Some(args.payment);
    }

    if !cart.is_empty() {
        print_cart(&cart);
        println!();
    }

    match workflow.submit(&mut cart).await {
        SubmitOutcome::Completed => {
            if let Some(receipt) = workflow.receipt() {
                println!("{receipt}");
            }
            if let Some(instructions) = args.payment.transfer_instructions() {
                println!();
                println!("{instructions}");
            }
            Ok(())
        }
        SubmitOutcome::Failed => {
            bail!(
                "order not placed: {}",
                workflow.error().unwrap_or("Unable to complete request")
            )
        }
        SubmitOutcome::Rejected if cart.is_empty() => bail!("cart is empty"),
        SubmitOutcome::Rejected => {
            bail!("missing {}", workflow.form().missing_fields().join(", "))
        }
    }
}

pub(crate) fn print_payment_methods() {
    for method in PaymentMethod::ALL {
        println!("{:<14} {}", method.as_str(), method.title());
        println!("{:<14} {}", "", method.description());
        if let Some(instructions) = method.transfer_instructions() {
            println!("{:<14} {}", "", instructions);
        }
    }
}
