//! Walk through the dashboard: sign in, browse, search, create, edit, delete.
//!
//! Run with `cargo run --example walkthrough`. Set `INVOICE_KIT_LATENCY=off`
//! to skip the simulated network delay, or `RUST_LOG=debug` for more output.

use invoice_kit::app::Screen;
use invoice_kit::form::{InvoiceFormInput, SubmitOutcome};
use invoice_kit::list::ListState;
use invoice_kit::{Config, InvoiceApp, Result};

fn print_list(state: &ListState) {
    for row in state.rows() {
        println!(
            "   {:<20} {:>12} {:<14} {}",
            row.name,
            row.amount,
            row.date,
            row.status.label()
        );
    }
    let pages: Vec<String> = state.pagination().iter().map(ToString::to_string).collect();
    println!("   pages: [{}]\n", pages.join(" "));
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    println!("\n=== Invoice Kit - Walkthrough ===\n");

    let mut app = InvoiceApp::demo(Config::from_env()?)?;

    // 1. Protected routes bounce to the login screen
    println!("1. Opening /invoices without a session:");
    println!("   -> {}\n", app.navigate("/invoices"));

    // 2. Sign in
    println!("2. Signing in as the demo user:");
    if let Err(e) = app.login("user@nextmail.com", "wrong") {
        println!("   x {}", e);
    }
    let landing = app.login("user@nextmail.com", "123456")?;
    println!("   ✓ signed in, landing on {}\n", landing);

    // 3. Dashboard
    println!("3. Dashboard:");
    let view = app.dashboard().load().await?;
    for card in &view.cards {
        println!("   {:<16} {}", card.title, card.value);
    }
    println!("   y-axis: {}\n", view.y_axis.labels.join(" "));

    // 4. Invoices list with a search
    println!("4. Invoices list:");
    let Screen::Invoices(list) = app.open("/invoices") else {
        return Ok(());
    };
    list.refresh().await;
    print_list(&list.snapshot().await);

    list.input_query("hector").await;
    println!("   search {} ->", list.location().await);
    print_list(&list.snapshot().await);

    // 5. Create
    println!("5. Creating an invoice:");
    let form = app.create_form();
    let ctx = form.load().await?;
    let Some(customer) = ctx.customers.last() else {
        return Ok(());
    };
    let outcome = form
        .submit(&InvoiceFormInput::new(&customer.id, "89.99", "pending"))
        .await;
    if let SubmitOutcome::Navigate(route) = outcome {
        println!("   ✓ created for {}, back to {}\n", customer.name, route);
    }

    // 6. Edit the newest invoice
    list.input_query("").await;
    let Some(newest) = list.snapshot().await.invoices.first().cloned() else {
        return Ok(());
    };
    println!("6. Marking {} as paid:", newest.id);
    let form = app.edit_form(newest.id.clone());
    let mut input = InvoiceFormInput::from_invoice(&newest);
    input.status = Some("paid".to_string());
    println!("   {} -> {:?}\n", form.submit_label().await, form.submit(&input).await);

    // 7. Delete it again
    println!("7. Deleting {}:", newest.id);
    list.delete(&newest.id).await;
    print_list(&list.snapshot().await);

    app.logout();
    println!("=== Done ===\n");
    Ok(())
}
