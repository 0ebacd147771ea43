use crate::error::AppError;
use crate::models::template::{DashboardTemplate, Panel};
use crate::models::transaction::Transaction;
use crate::operations::aggregate::{self, CategoryTotal, MonthlyPoint, Totals, YearScope};
use crate::operations::summary::{
    RECENT_ACTIVITY_LIMIT, category_shares, format_money, recent_activity, signed_amount,
    transaction_line,
};
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Modifier,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};
use std::collections::HashMap;
use std::io;

const PALETTE: [Color; 8] = [
    Color::Blue,
    Color::Cyan,
    Color::Yellow,
    Color::LightRed,
    Color::Magenta,
    Color::Green,
    Color::LightYellow,
    Color::LightCyan,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Transactions,
}

impl Tab {
    fn toggle(self) -> Self {
        match self {
            Tab::Overview => Tab::Transactions,
            Tab::Transactions => Tab::Overview,
        }
    }
}

struct DashboardData<'a> {
    template: DashboardTemplate,
    totals: Totals,
    breakdown: Vec<CategoryTotal>,
    category_colors: HashMap<String, Color>,
    monthly: Vec<MonthlyPoint>,
    transactions: &'a [Transaction],
}

pub fn run_dashboard(
    transactions: &[Transaction],
    template: DashboardTemplate,
    reference: DateTime<Utc>,
    scope: YearScope,
) -> Result<(), AppError> {
    let data = build_dashboard(transactions, template, reference, scope);
    render_dashboard(&data)
}

fn build_dashboard(
    transactions: &[Transaction],
    template: DashboardTemplate,
    reference: DateTime<Utc>,
    scope: YearScope,
) -> DashboardData<'_> {
    let breakdown = aggregate::category_breakdown(transactions);
    let category_colors = assign_colors(&breakdown);
    DashboardData {
        template,
        totals: aggregate::totals(transactions),
        breakdown,
        category_colors,
        monthly: aggregate::monthly_series_scoped(transactions, reference, scope),
        transactions,
    }
}

fn assign_colors(breakdown: &[CategoryTotal]) -> HashMap<String, Color> {
    breakdown
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.name.clone(), PALETTE[idx % PALETTE.len()]))
        .collect()
}

fn terminal_error(context: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Terminal(format!("{}: {}", context, e))
}

/// Runs `restore` when dropped, so every exit path puts the terminal back.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        log::warn!("failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        log::warn!("failed to leave alternate screen: {}", e);
    }
}

fn enter_terminal() -> Result<TerminalGuard<fn()>, AppError> {
    enable_raw_mode().map_err(|e| terminal_error("Failed to enable raw mode", e))?;
    let guard = TerminalGuard::new(restore_terminal as fn());
    execute!(io::stdout(), EnterAlternateScreen)
        .map_err(|e| terminal_error("Failed to enter alternate screen", e))?;
    Ok(guard)
}

fn render_dashboard(data: &DashboardData) -> Result<(), AppError> {
    let _guard = enter_terminal()?;
    let backend = ratatui::backend::CrosstermBackend::new(io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)
        .map_err(|e| terminal_error("Failed to initialize terminal", e))?;
    let mut tab = Tab::Overview;

    loop {
        terminal
            .draw(|frame| {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(1), Constraint::Min(3)])
                    .split(frame.area());

                render_tab_bar(frame, layout[0], data.template, tab);
                match tab {
                    Tab::Overview => render_overview(frame, layout[1], data),
                    Tab::Transactions => render_all_transactions(frame, layout[1], data),
                }
            })
            .map_err(|e| terminal_error("Failed to draw terminal UI", e))?;

        if event::poll(std::time::Duration::from_millis(250))
            .map_err(|e| terminal_error("Failed to poll input", e))?
        {
            match event::read().map_err(|e| terminal_error("Failed to read input", e))? {
                Event::Key(key) if key.kind != KeyEventKind::Press => {}
                Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => {
                    break;
                }
                Event::Key(key) if key.code == KeyCode::Tab => tab = tab.toggle(),
                _ => {}
            }
        }
    }

    Ok(())
}

fn render_tab_bar(frame: &mut ratatui::Frame, area: Rect, template: DashboardTemplate, tab: Tab) {
    let tab_style = |active: bool| {
        if active {
            Style::default().fg(Color::Black).bg(Color::White)
        } else {
            Style::default().fg(Color::Gray)
        }
    };
    let line = Line::from(vec![
        Span::styled(" Finance Tracker ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(" Overview ", tab_style(tab == Tab::Overview)),
        Span::raw(" "),
        Span::styled(" Transactions ", tab_style(tab == Tab::Transactions)),
        Span::styled(
            format!("   template: {}  (Tab to switch, q to exit)", template),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_overview(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let cards = data.template.shows(Panel::SummaryCards);
    let mut constraints = vec![Constraint::Length(if cards { 3 } else { 0 })];
    let lower: Vec<Panel> = data
        .template
        .panels()
        .iter()
        .copied()
        .filter(|p| !matches!(p, Panel::SummaryCards | Panel::AllTransactions))
        .collect();
    if !lower.is_empty() {
        constraints.push(Constraint::Min(5));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if cards {
        render_cards(frame, rows[0], &data.totals);
    }
    if lower.is_empty() {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, lower.len() as u32); lower.len()])
        .split(rows[1]);

    for (panel, column) in lower.iter().zip(columns.iter()) {
        match panel {
            Panel::CategoryBreakdown => render_category_panel(frame, *column, data),
            Panel::MonthlyTrend => render_monthly_chart(frame, *column, data),
            Panel::RecentActivity => render_recent_activity(frame, *column, data),
            Panel::SummaryCards | Panel::AllTransactions => {}
        }
    }
}

fn render_cards(frame: &mut ratatui::Frame, area: Rect, totals: &Totals) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let entries = [
        ("Balance", totals.balance, Color::White),
        ("Income", totals.income, Color::Green),
        ("Expenses", totals.expense, Color::Red),
    ];
    for ((title, amount, color), card) in entries.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Span::styled(
            format_money(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, *card);
    }
}

fn render_category_panel(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let block = Block::default()
        .title("Expense by Category")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.breakdown.is_empty() {
        let empty = Paragraph::new("No expense data available").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);
    render_pie_chart(frame, halves[0], data);
    render_category_legend(frame, halves[1], data);
}

fn render_pie_chart(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let total = data.totals.expense;
    if total.is_nan() || total <= 0.0 {
        return;
    }

    let mut slices = Vec::new();
    let mut start_angle = 0.0_f64;
    for category in &data.breakdown {
        let sweep = category.value / total * std::f64::consts::TAU;
        slices.push((start_angle, start_angle + sweep, category.name.as_str()));
        start_angle += sweep;
    }

    let canvas = Canvas::default()
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (start, end, name) in &slices {
                let color = data.category_colors.get(*name).copied().unwrap_or(Color::White);
                let mut points = Vec::new();
                let mut r = 0.0;
                while r <= 1.0 {
                    let mut angle = *start;
                    while angle <= *end {
                        points.push((r * angle.cos(), r * angle.sin()));
                        angle += 0.05;
                    }
                    r += 0.04;
                }
                if !points.is_empty() {
                    ctx.draw(&Points {
                        coords: &points,
                        color,
                    });
                }
            }
        });
    frame.render_widget(canvas, area);
}

fn render_category_legend(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let lines: Vec<Line> = category_shares(&data.breakdown)
        .into_iter()
        .map(|(name, value, percent)| {
            let color = data.category_colors.get(&name).copied().unwrap_or(Color::White);
            Line::from(vec![
                Span::styled(format!("{:15}", name), Style::default().fg(color)),
                Span::styled(format!("{:>12}", format_money(value)), Style::default().fg(color)),
                Span::raw(format!(" {:>3}%", percent)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn bar_height(amount: f64) -> u64 {
    // NaN and negatives draw as empty bars
    if amount > 0.0 { amount.round() as u64 } else { 0 }
}

fn render_monthly_chart(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(Line::from(vec![
                    Span::raw("Monthly Trend  "),
                    Span::styled("income", Style::default().fg(Color::Green)),
                    Span::raw(" / "),
                    Span::styled("expenses", Style::default().fg(Color::Red)),
                ]))
                .borders(Borders::ALL),
        )
        .bar_width(3)
        .bar_gap(0)
        .group_gap(2);

    for point in &data.monthly {
        let bars = [
            Bar::default()
                .value(bar_height(point.income))
                .text_value(String::new())
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(bar_height(point.expense))
                .text_value(String::new())
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(point.month.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn activity_line(transaction: &Transaction) -> Line<'static> {
    let color = if transaction.is_expense() {
        Color::Red
    } else {
        Color::Green
    };
    Line::from(vec![
        Span::raw(format!(
            "{:<15} {}  ",
            transaction.category,
            transaction.date.format("%Y-%m-%d")
        )),
        Span::styled(
            format!("{:>12}", signed_amount(transaction)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_recent_activity(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let block = Block::default().title("Recent Activity").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.transactions.is_empty() {
        let empty = Paragraph::new("No transactions yet").alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = recent_activity(data.transactions, RECENT_ACTIVITY_LIMIT)
        .into_iter()
        .map(activity_line)
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_all_transactions(frame: &mut ratatui::Frame, area: Rect, data: &DashboardData) {
    let block = Block::default()
        .title(format!("All Transactions ({})", data.transactions.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if data.transactions.is_empty() {
        let empty = Paragraph::new("No transactions yet. Use `add` to get started.")
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = data
        .transactions
        .iter()
        .map(|t| {
            let color = if t.is_expense() { Color::Red } else { Color::Green };
            Line::from(Span::styled(transaction_line(t), Style::default().fg(color)))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
