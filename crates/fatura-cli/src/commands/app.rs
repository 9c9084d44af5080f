//! Interactive walkthrough
//!
//! Drives the screen flow through a [`Navigator`]: pick a user, look at the
//! dashboard, drill into the bill or anomalies, build a what-if scenario and
//! check it out. Input is read line by line so the flow can be scripted.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use fatura_core::format::money;
use fatura_core::screens::{
    AnomaliesScreen, BillDetailScreen, CheckoutScreen, DashboardScreen, UserSelectionScreen,
    WhatIfCatalog, WhatIfScreen,
};
use fatura_core::session::{Navigator, Route};
use fatura_core::ApiService;
use tracing::debug;

use super::{
    print_anomalies, print_bill_detail, print_checkout_summary,
    print_dashboard, print_simulation, submit_checkout, truncate,
};

/// Print `label` and read one trimmed line; `None` on end of input
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{} ", label);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn is_quit(line: &str) -> bool {
    matches!(line, "q" | "quit" | "exit")
}

pub async fn cmd_app<R: BufRead>(
    service: &ApiService,
    period: &str,
    user_id: Option<i64>,
    mut input: R,
) -> Result<()> {
    let mut nav = Navigator::new(period);

    if let Some(id) = user_id {
        let user = service
            .get_user(id)
            .await
            .with_context(|| format!("Failed to load user {}", id))?;
        nav.select_user(user.user_id, &user.name);
    }

    loop {
        debug!("Screen: {}", nav.current());
        let keep_going = match nav.current() {
            Route::UserSelection => user_selection(service, &mut nav, &mut input).await?,
            Route::Dashboard => dashboard(service, &mut nav, &mut input).await?,
            Route::BillDetail => {
                let mut screen = BillDetailScreen::new(service.clone(), nav.period_params()?);
                screen.load().await;
                if let Err(e) = print_bill_detail(&screen) {
                    println!("❌ {}", e);
                }
                nav.back();
                true
            }
            Route::Anomalies => {
                let mut screen = AnomaliesScreen::new(service.clone(), nav.period_params()?);
                screen.load().await;
                if let Err(e) = print_anomalies(&screen) {
                    println!("❌ {}", e);
                }
                nav.back();
                true
            }
            Route::WhatIfSimulator => whatif(service, &mut nav, &mut input).await?,
            Route::Checkout => checkout(service, &mut nav, &mut input).await?,
        };

        if !keep_going {
            println!("👋 Bye");
            return Ok(());
        }
    }
}

async fn user_selection<R: BufRead>(
    service: &ApiService,
    nav: &mut Navigator,
    input: &mut R,
) -> Result<bool> {
    let mut screen = UserSelectionScreen::new(service.clone());
    screen.load().await;

    if let Some(err) = screen.users().error() {
        println!("❌ {}", err);
        let Some(line) = prompt(input, "[r]etry  [q]uit:")? else {
            return Ok(false);
        };
        return Ok(!is_quit(&line));
    }
    let users = screen.users().data().map(Vec::as_slice).unwrap_or_default();

    println!();
    println!("👥 Select a user");
    for user in users {
        println!(
            "   {:>6}  {:<24} {}",
            user.user_id,
            truncate(&user.name, 24),
            user.account_type
        );
    }

    let Some(line) = prompt(input, "User id (q to quit):")? else {
        return Ok(false);
    };
    if is_quit(&line) {
        return Ok(false);
    }

    match line.parse::<i64>().ok().and_then(|id| screen.find(id)) {
        Some(user) => nav.select_user(user.user_id, &user.name),
        None => println!("❌ Unknown user '{}'", line),
    }
    Ok(true)
}

async fn dashboard<R: BufRead>(
    service: &ApiService,
    nav: &mut Navigator,
    input: &mut R,
) -> Result<bool> {
    let params = nav.dashboard_params()?;
    println!();
    println!("Hello, {}", params.user_name);

    let mut screen = DashboardScreen::new(service.clone(), params, &nav.session().period);
    screen.load().await;
    if print_dashboard(&screen).is_err() {
        println!("  [r] reloads, [p YYYY-MM] picks another period");
    }

    let Some(line) = prompt(
        input,
        "[b]ill  [a]nomalies  [w]hat-if  [p YYYY-MM] period  [r]eload  [u]sers  [q]uit:",
    )?
    else {
        return Ok(false);
    };

    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["b"] => nav.navigate(Route::BillDetail)?,
        ["a"] => nav.navigate(Route::Anomalies)?,
        ["w"] => nav.navigate(Route::WhatIfSimulator)?,
        ["r"] => {}
        ["u"] => {
            nav.back();
        }
        ["p", period] => {
            if let Err(e) = nav.set_period(period) {
                println!("❌ {}", e);
            }
        }
        [cmd] if is_quit(cmd) => return Ok(false),
        _ => println!("❌ Unknown choice '{}'", line),
    }
    Ok(true)
}

fn print_catalog(catalog: &WhatIfCatalog) {
    println!();
    println!("  Plans:");
    for plan in &catalog.plans {
        println!(
            "    #{:<4} {:<20} {:>10}",
            plan.plan_id,
            truncate(&plan.plan_name, 20),
            money(plan.monthly_price)
        );
    }
    println!("  Addons:");
    for addon in &catalog.addons {
        println!(
            "    #{:<4} {:<20} {:>10}",
            addon.addon_id,
            truncate(&addon.name, 20),
            money(addon.price)
        );
    }
    if !catalog.vas.is_empty() {
        println!("  Value-added services:");
        for vas in &catalog.vas {
            println!(
                "    {:<12} {:<20} {:>10}",
                vas.vas_id,
                truncate(&vas.name, 20),
                money(vas.monthly_fee)
            );
        }
    }
    println!();
}

const WHATIF_HELP: &str = "plan N | addon N | vas ID | novas | sms | roaming | clear | run | checkout | back | q";

async fn whatif<R: BufRead>(
    service: &ApiService,
    nav: &mut Navigator,
    input: &mut R,
) -> Result<bool> {
    let mut screen = WhatIfScreen::new(service.clone(), nav.whatif_params()?);
    if let Some(scenario) = nav.session().scenario.clone() {
        screen = screen.with_scenario(scenario);
    }
    screen.load().await;

    match (screen.catalog().data(), screen.catalog().error()) {
        (Some(catalog), _) => print_catalog(catalog),
        (None, Some(err)) => println!("❌ {}", err),
        (None, None) => {}
    }
    if let Some(plan) = screen.current_plan() {
        println!("  Current plan: {}", plan.plan_name);
    }

    loop {
        let Some(line) = prompt(input, &format!("what-if ({}):", WHATIF_HELP))? else {
            return Ok(false);
        };

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["plan", id] => match id.parse() {
                Ok(id) => screen.select_plan(id),
                Err(_) => println!("❌ Plan id must be a number"),
            },
            ["addon", id] => match id.parse() {
                Ok(id) => screen.toggle_addon(id),
                Err(_) => println!("❌ Addon id must be a number"),
            },
            ["vas", id] => screen.toggle_vas(id),
            ["novas"] => screen.toggle_disable_vas(),
            ["sms"] => screen.toggle_block_premium_sms(),
            ["roaming"] => screen.toggle_roaming_block(),
            ["clear"] => screen.reset(),
            ["run"] => match screen.run_simulation().await {
                Ok(()) => {
                    if let Err(e) = print_simulation(&screen) {
                        println!("❌ {}", e);
                    }
                }
                Err(e) => println!("❌ {}", e),
            },
            ["checkout"] => match screen.checkout_handoff() {
                Ok((scenario, result)) => {
                    nav.record_simulation(scenario, result);
                    nav.navigate(Route::Checkout)?;
                    return Ok(true);
                }
                Err(e) => println!("❌ {}", e),
            },
            ["back"] => {
                nav.back();
                return Ok(true);
            }
            [cmd] if is_quit(cmd) => return Ok(false),
            _ => println!("❌ Unknown command '{}'", line),
        }
    }
}

async fn checkout<R: BufRead>(
    service: &ApiService,
    nav: &mut Navigator,
    input: &mut R,
) -> Result<bool> {
    let mut screen = CheckoutScreen::new(service.clone(), nav.checkout_params()?);
    print_checkout_summary(&screen);

    let Some(line) = prompt(input, "Place this order? [y/N]:")? else {
        return Ok(false);
    };
    if !matches!(line.as_str(), "y" | "Y" | "yes") {
        nav.back();
        return Ok(true);
    }

    match submit_checkout(&mut screen).await {
        Ok(()) => nav.finish_checkout(),
        Err(e) => {
            println!("❌ {}", e);
            nav.back();
        }
    }
    Ok(true)
}
