use crate::cli::commands::{open_repository, resolve_period};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::net_pay::{calculate_net_pay, entry_net_pay};
use crate::core::pay::PayManager;
use crate::core::repository::fetch_period;
use crate::errors::AppResult;
use crate::models::gross_salary::GrossSalary;
use crate::ui::messages::{field, header, info};
use crate::utils::formatting::money;
use std::cell::RefCell;
use std::rc::Rc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Pay { period: args } = cmd {
        let repo = open_repository(cfg)?;
        let period = resolve_period(args, cfg, &repo, &SystemClock)?;

        if cfg.settings.gross_pay_per_month == 0 {
            info("Gross pay per month is 0: set it with `paytimer config --gross-pay AMOUNT`.");
        }

        let mut manager = PayManager::new(
            repo.clone(),
            Rc::new(SystemClock),
            cfg.settings.clone(),
            period,
        );

        let latest: Rc<RefCell<Option<GrossSalary>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&latest);
        manager.subscribe(Box::new(move |g: &GrossSalary| {
            *sink.borrow_mut() = Some(g.clone());
        }));

        manager.refresh();
        manager.run_pending();

        let Some(salary) = latest.borrow_mut().take() else {
            return Ok(());
        };
        print_salary(&salary);

        if cfg.settings.is_calculating_net_pay {
            let entries = fetch_period(&*repo, &period)?;
            let net_up_to_date: f64 = entries
                .iter()
                .filter_map(|e| e.calculated_net_pay.or_else(|| entry_net_pay(e)))
                .sum();
            print_net(cfg.settings.gross_pay_per_month, net_up_to_date);
        }
    }

    Ok(())
}

fn print_salary(g: &GrossSalary) {
    header(format!("Gross salary {}", g.period));
    field("Working days", g.number_of_working_days);
    field("Pay per hour", money(g.pay_per_hour));
    field("Earned so far", money(g.pay_up_to_date));
    field(
        "Predicted",
        g.pay_predicted
            .map(money)
            .unwrap_or_else(|| "-".to_string()),
    );
}

fn print_net(monthly_gross: i64, net_up_to_date: f64) {
    let n = calculate_net_pay(monthly_gross as f64);
    println!();
    header(format!("Net pay (monthly gross {})", monthly_gross));
    field("Social security", money(n.social_security));
    field("Health insurance", money(n.health_insurance));
    field("Income tax", money(n.income_tax));
    field("Net per month", money(n.net));
    field("Net earned so far", money(net_up_to_date));
}
