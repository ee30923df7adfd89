//! Maps a free-text spending question to a fixed set of answers.
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Savings,
    Trend,
    Tip,
    PaymentsLastWeek,
    PaymentsLastMonth,
    ExpensesThisMonth,
    PaymentsThisMonth,
    Help,
}

const TIPS: &[&str] = &[
    "Track your expenses regularly to avoid overspending.",
    "Set a monthly budget and try to save at least 20% of your income.",
    "Review your subscriptions and cancel those you don't use.",
    "Plan for emergencies by building an emergency fund.",
    "Use digital tools to automate bill payments and savings.",
];

fn any_of(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub fn classify(message: &str) -> Intent {
    let q = message.to_lowercase();
    let this_month = q.contains("this month");

    if q.contains("savings") {
        Intent::Savings
    } else if q.contains("trend") {
        Intent::Trend
    } else if any_of(&q, &["tip", "advice", "health"]) {
        Intent::Tip
    } else if any_of(&q, &["last week", "past week", "previous week"]) {
        Intent::PaymentsLastWeek
    } else if any_of(&q, &["last month", "past month", "previous month"]) {
        Intent::PaymentsLastMonth
    } else if q.contains("expenses") && this_month {
        Intent::ExpensesThisMonth
    } else if any_of(&q, &["payment", "spending", "spent"]) && this_month {
        Intent::PaymentsThisMonth
    } else {
        Intent::Help
    }
}

pub fn random_tip() -> &'static str {
    TIPS.choose(&mut rand::thread_rng()).copied().unwrap_or(TIPS[0])
}

pub fn savings_answer(budget: f64, expenses: f64) -> String {
    format!(
        "Your estimated savings this month are ₹{:.2}. (Budget: ₹{budget:.2}, Expenses: ₹{expenses:.2})",
        budget - expenses
    )
}

pub fn trend_answer(this_month: f64, last_month: f64) -> String {
    let diff = this_month - last_month;
    let trend = if diff > 0.0 {
        "increased"
    } else if diff < 0.0 {
        "decreased"
    } else {
        "remained the same"
    };
    format!(
        "Your spending has {trend} by ₹{:.2} compared to last month. (This month: ₹{this_month:.2}, Last month: ₹{last_month:.2})",
        diff.abs()
    )
}

pub const HELP_ANSWER: &str = "I can tell you what you spent last week, last month or this month, \
     your expenses this month, your estimated savings, your spending trend, \
     or share a financial health tip.";
