use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub tabs: Rect,
    pub content: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Screen tabs
            Constraint::Min(5),    // Active screen
            Constraint::Length(3), // Command line / key hints
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        tabs: chunks[0],
        content: chunks[1],
        input_box: chunks[2],
        status_bar: chunks[3],
    }
}

/// Cart screen: optional budget bar | item list | totals.
pub struct CartLayout {
    pub budget: Option<Rect>,
    pub items: Rect,
    pub totals: Rect,
}

pub fn cart_layout(area: Rect, show_budget: bool) -> CartLayout {
    let budget_h = if show_budget { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(budget_h),
            Constraint::Min(3),
            Constraint::Length(5),
        ])
        .split(area);

    CartLayout {
        budget: show_budget.then_some(chunks[0]),
        items: chunks[1],
        totals: chunks[2],
    }
}

/// A popup of at most `width` x `height`, centred in `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}
