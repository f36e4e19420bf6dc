use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use tracing_subscriber::EnvFilter;

use auth_flow::{
    AuthFlowController, FlowConfig, LoginStep, MockProvider, OtpGateway, SimulatedGateway,
    SocialProvider, UserType, OTP_LEN,
};

mod config;
mod gateway;
mod observer;

use crate::config::CliConfig;
use crate::gateway::TwilioGateway;
use crate::observer::ConsoleObserver;

/// Sign in to ILAVA from the terminal.
#[derive(Debug, Parser)]
#[command(name = "ilava-login")]
struct Args {
    /// Which dashboard to sign in to.
    #[arg(long, value_enum, default_value_t = Audience::Farmer)]
    user_type: Audience,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Audience {
    Farmer,
    Buyer,
}

impl From<Audience> for UserType {
    fn from(audience: Audience) -> Self {
        match audience {
            Audience::Farmer => UserType::Farmer,
            Audience::Buyer => UserType::Buyer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = CliConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let term = Term::stdout();
    print_banner(&term)?;

    let gateway: Arc<dyn OtpGateway> = match config.twilio {
        Some(options) => {
            println!(
                "{}",
                "Verification codes will be delivered via Twilio".bright_yellow()
            );
            Arc::new(TwilioGateway::new(options))
        }
        None => Arc::new(SimulatedGateway::new()),
    };

    let mut flow = AuthFlowController::new(
        FlowConfig::new(UserType::from(args.user_type)),
        gateway,
        Arc::new(MockProvider),
        Box::new(ConsoleObserver),
    );

    while !flow.is_complete() {
        let keep_going = match flow.step() {
            LoginStep::Options => options_step(&term, &mut flow).await?,
            LoginStep::Email => email_step(&mut flow).await?,
            LoginStep::Phone => phone_step(&mut flow).await?,
            LoginStep::Otp => otp_step(&mut flow).await?,
            LoginStep::Complete => break,
        };
        if !keep_going {
            println!("{}", "👋 Goodbye!".bright_blue());
            return Ok(());
        }
    }

    Ok(())
}

fn print_banner(term: &Term) -> Result<()> {
    term.clear_screen()?;
    println!(
        "{}",
        "╔════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║            ILAVA · Sign in             ║".bright_cyan()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════╝".bright_cyan()
    );
    println!();
    Ok(())
}

async fn options_step(term: &Term, flow: &mut AuthFlowController) -> Result<bool> {
    let options = vec![
        "📧 Continue with email",
        "📱 Continue with phone",
        "🔵 Continue with Google",
        "🍎 Continue with Apple",
        "🚪 Exit",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("How would you like to sign in?")
        .items(&options)
        .default(0)
        .interact_on(term)?;

    match selection {
        0 => flow.select_method(LoginStep::Email).await,
        1 => flow.select_method(LoginStep::Phone).await,
        2 => flow.select_social(SocialProvider::Google).await,
        3 => flow.select_social(SocialProvider::Apple).await,
        4 => return Ok(false),
        _ => unreachable!(),
    }

    Ok(true)
}

async fn email_step(flow: &mut AuthFlowController) -> Result<bool> {
    let theme = ColorfulTheme::default();
    let email: String = Input::with_theme(&theme)
        .with_prompt("Email (blank to go back)")
        .allow_empty(true)
        .interact_text()?;

    if email.is_empty() {
        flow.back().await;
        return Ok(true);
    }

    let password = Password::with_theme(&theme)
        .with_prompt("Password (min 6 chars)")
        .interact()?;

    flow.submit_email_form(email, password).await;
    Ok(true)
}

async fn phone_step(flow: &mut AuthFlowController) -> Result<bool> {
    let phone_number: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Phone number (blank to go back)")
        .allow_empty(true)
        .interact_text()?;

    if phone_number.is_empty() {
        flow.back().await;
        return Ok(true);
    }

    flow.submit_phone_form(phone_number).await;
    Ok(true)
}

async fn otp_step(flow: &mut AuthFlowController) -> Result<bool> {
    let code: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Code (r to resend, blank to go back)")
        .allow_empty(true)
        .interact_text()?;

    if code.is_empty() {
        flow.back().await;
        return Ok(true);
    }
    if code == "r" {
        flow.resend().await;
        return Ok(true);
    }

    // One slot per character; short input leaves slots empty and the
    // flow surfaces the incomplete-code message.
    let mut digits: [String; OTP_LEN] = Default::default();
    for (slot, ch) in digits.iter_mut().zip(code.chars()) {
        *slot = ch.to_string();
    }
    flow.submit_otp_form(digits).await;
    Ok(true)
}
