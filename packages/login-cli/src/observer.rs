//! Terminal rendering of flow notifications.

use auth_flow::{AuthOutcome, DispatchReceipt, FlowObserver, LoginStep, UserType};
use colored::Colorize;

/// Observer that renders flow progress to stdout.
pub struct ConsoleObserver;

impl FlowObserver for ConsoleObserver {
    fn on_step_changed(&mut self, step: LoginStep, receipt: Option<&DispatchReceipt>) {
        match step {
            LoginStep::Otp => {
                if let Some(receipt) = receipt {
                    println!();
                    println!("{}", receipt.prompt().bright_cyan());
                    if receipt.attempt > 1 {
                        println!(
                            "{}",
                            format!("(code re-sent, attempt {})", receipt.attempt).dimmed()
                        );
                    }
                }
            }
            LoginStep::Options => println!("{}", "Back to sign-in options".dimmed()),
            _ => {}
        }
    }

    fn on_success(&mut self, outcome: &AuthOutcome) {
        let dashboard = match outcome.user_type {
            UserType::Farmer => "Farmer Dashboard",
            UserType::Buyer => "Buyer Dashboard",
        };
        println!();
        println!(
            "{}",
            format!("✔ Signed in as {} ({})", outcome.user_type, outcome.user_id)
                .bright_green()
                .bold()
        );
        println!("{}", format!("→ Routing to the {}", dashboard).bright_green());
    }

    fn on_error(&mut self, message: &str) {
        println!("{}", message.bright_red());
    }
}
