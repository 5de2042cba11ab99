mod theme;

use crate::app::layout::{REMOVE_TARGET_WIDTH, ScreenLayout, palette_list_area, screen_layout};
use crate::app::{AppModel, ConfirmSelection, CopyTarget, Focus, PickerStatus};
use crate::domain::HexColor;
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const HIGHLIGHT_SYMBOL: &str = "▸ ";

pub fn render(frame: &mut Frame, model: &AppModel) {
    let full_area = frame.area();
    if full_area.width == 0 || full_area.height == 0 {
        return;
    }

    let layout = screen_layout(full_area);
    render_menu_bar(frame, &layout, model);
    render_swatch(frame, layout.swatch, &model.current);
    render_values(frame, layout.values, model);
    render_input(frame, layout.input, model);
    render_palette(frame, layout.palette, model);
    render_footer(frame, layout.footer, model);

    let body = Rect {
        x: full_area.x,
        y: layout.swatch.y,
        width: full_area.width,
        height: full_area.height.saturating_sub(2),
    };

    if model.help_open {
        render_help_overlay(frame, body, model);
    }

    if let Some(confirm) = &model.clear_confirm {
        render_clear_confirm_overlay(frame, body, confirm);
    }
}

fn render_menu_bar(frame: &mut Frame, layout: &ScreenLayout, model: &AppModel) {
    let area = layout.menu_bar;
    let base_style = Style::default().fg(theme::FG).bg(theme::BAR_BG);
    let title_style = base_style.add_modifier(Modifier::BOLD);

    let title = " swatchbox ".to_string();
    let count = format!(" {} saved ", model.palette.len());
    let (picker_text, picker_style) = match &model.picker {
        PickerStatus::Unavailable => (
            " pick: unavailable ".to_string(),
            base_style.fg(theme::DIM),
        ),
        PickerStatus::Ready { label } => (format!(" pick (p): {label} "), base_style.fg(theme::MUTED)),
        PickerStatus::Picking { label } => (
            format!(" picking with {label}… "),
            base_style.fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
    };

    let used_width = UnicodeWidthStr::width(title.as_str())
        + UnicodeWidthStr::width(count.as_str())
        + UnicodeWidthStr::width(picker_text.as_str());
    let remaining = (area.width as usize).saturating_sub(used_width);

    let spans = vec![
        Span::styled(title, title_style),
        Span::styled(count, base_style.fg(theme::MUTED)),
        Span::styled(" ".repeat(remaining), base_style),
        Span::styled(picker_text, picker_style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}

fn render_swatch(frame: &mut Frame, area: Rect, color: &HexColor) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .title("Current");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let fill = Style::default()
        .bg(theme::swatch(color))
        .fg(theme::on_swatch(color));
    let label_row = inner.height / 2;
    let lines = (0..inner.height)
        .map(|row| {
            if row == label_row {
                Line::from(Span::styled(
                    color.to_string(),
                    fill.add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from("")
            }
        })
        .collect::<Vec<_>>();

    frame.render_widget(
        Paragraph::new(lines).style(fill).alignment(Alignment::Center),
        inner,
    );
}

fn render_values(frame: &mut Frame, area: Rect, model: &AppModel) {
    let now = Instant::now();
    let lines = CopyTarget::ALL
        .iter()
        .map(|&target| {
            let copied = model
                .copied
                .is_some_and(|marker| marker.target == target && marker.is_fresh(now));
            let hint = if copied {
                Span::styled(
                    "Copied!",
                    Style::default()
                        .fg(theme::SUCCESS)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    format!("[{}] copy", target.hotkey()),
                    Style::default().fg(theme::DIM),
                )
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<5}", target.label()),
                    Style::default().fg(theme::MUTED),
                ),
                Span::styled(
                    format!("{:<22}", target.value(&model.current)),
                    Style::default().fg(theme::FG),
                ),
                hint,
            ])
        })
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BORDER))
            .padding(Padding::horizontal(1))
            .title("Values"),
    );
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, model: &AppModel) {
    let focused = model.focus == Focus::Input;
    let border_style = if focused {
        Style::default().fg(theme::ACCENT)
    } else {
        Style::default().fg(theme::BORDER)
    };
    let title = if focused {
        "Hex (Enter apply, Esc done)"
    } else {
        "Hex (e to edit)"
    };

    let valid = model.input.color().is_some();
    let text_style = if !focused || valid {
        Style::default().fg(theme::FG)
    } else {
        Style::default().fg(theme::ERROR)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::horizontal(1))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(
        Paragraph::new(Span::styled(model.input.text.clone(), text_style)).block(block),
        area,
    );

    if focused && inner.width > 0 && inner.height > 0 {
        let col = u16::try_from(model.input.cursor_col)
            .unwrap_or(u16::MAX)
            .min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(inner.x + col, inner.y));
    }
}

fn render_palette(frame: &mut Frame, area: Rect, model: &AppModel) {
    let title = format!("Palette ({})", model.palette.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER))
        .padding(Padding::horizontal(1))
        .title(title);

    if model.palette.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No colors saved yet. Pick some colors!",
            Style::default().fg(theme::MUTED),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list_area = palette_list_area(area);
    let row_width = (list_area.width as usize).saturating_sub(UnicodeWidthStr::width(HIGHLIGHT_SYMBOL));
    let items = model
        .palette
        .iter()
        .enumerate()
        .map(|(index, color)| palette_list_item(index, color, &model.current, row_width))
        .collect::<Vec<_>>();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

    let mut state = ListState::default()
        .with_offset(model.palette_scroll)
        .with_selected(Some(model.selected.min(model.palette.len().saturating_sub(1))));
    frame.render_stateful_widget(list, area, &mut state);
}

fn palette_list_item(
    index: usize,
    color: &HexColor,
    current: &HexColor,
    row_width: usize,
) -> ListItem<'static> {
    let number = format!("{:>2} ", index + 1);
    let chip = "      ";
    let label = format!(" {color}");
    let marker = if color == current { " ●" } else { "" };
    let remove = " × ";

    let used = UnicodeWidthStr::width(number.as_str())
        + UnicodeWidthStr::width(chip)
        + UnicodeWidthStr::width(label.as_str())
        + UnicodeWidthStr::width(marker)
        + usize::from(REMOVE_TARGET_WIDTH);
    let gap = row_width.saturating_sub(used);

    ListItem::new(Line::from(vec![
        Span::styled(number, Style::default().fg(theme::DIM)),
        Span::styled(chip, Style::default().bg(theme::swatch(color))),
        Span::raw(label),
        Span::styled(marker, Style::default().fg(theme::MUTED)),
        Span::raw(" ".repeat(gap)),
        Span::styled(remove, Style::default().fg(theme::ERROR)),
    ]))
}

fn render_footer(frame: &mut Frame, area: Rect, model: &AppModel) {
    let keys = match model.focus {
        Focus::Input => "Keys: type hex  Enter=apply  Esc/Tab=done  Ctrl+U=clear",
        Focus::Palette => {
            "Keys: p=pick  e=edit  a=add  ↑/↓=move  Enter=load  d=remove  c=clear  x=export  1/2/3=copy  ?=help  q=quit"
        }
    };

    let mut spans = vec![Span::styled(keys.to_string(), Style::default().fg(theme::DIM))];
    if let Some(notice) = model.notice.as_deref().filter(|n| !n.trim().is_empty()) {
        spans.push(Span::styled("  ·  ", Style::default().fg(theme::DIM)));
        spans.push(Span::styled(
            notice.to_string(),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, model: &AppModel) {
    let popup = centered_rect(64, 80, area);
    frame.render_widget(Clear, popup);

    let picker_line = match &model.picker {
        PickerStatus::Unavailable => {
            "  - p: pick from screen (unavailable: install hyprpicker or xcolor, or set SWATCHBOX_PICKER)"
                .to_string()
        }
        PickerStatus::Ready { label } | PickerStatus::Picking { label } => {
            format!("  - p: pick from screen ({label})")
        }
    };

    let text = vec![
        Line::from("Color"),
        Line::from(picker_line),
        Line::from("  - e, / or Tab: edit the hex value (# starts a fresh one)"),
        Line::from("  - 1 / 2 / 3: copy HEX / RGB / HSL"),
        Line::from("  - Ctrl+Shift+V: paste a hex value"),
        Line::from(""),
        Line::from("Palette"),
        Line::from("  - a: add current color"),
        Line::from("  - Arrows, PgUp/PgDn, Home/End: move selection"),
        Line::from("  - Enter or click: load color"),
        Line::from("  - d, Del or click ×: remove color"),
        Line::from("  - c: clear all (asks first)"),
        Line::from("  - x: copy CSS variables to the clipboard"),
        Line::from(""),
        Line::from("Global"),
        Line::from("  - q, Ctrl+Q or Ctrl+C: quit"),
        Line::from("  - F1 or ?: toggle this help"),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(1))
            .title("Help (F1 or ? to close)"),
    );
    frame.render_widget(paragraph, popup);
}

fn render_clear_confirm_overlay(
    frame: &mut Frame,
    area: Rect,
    confirm: &crate::app::ClearConfirmDialog,
) {
    let popup = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .title("Clear Palette");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let noun = if confirm.color_count == 1 { "color" } else { "colors" };
    let message = vec![
        Line::from(crate::domain::CLEAR_CONFIRM_PROMPT),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} saved {noun} will be removed.", confirm.color_count),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(message).wrap(Wrap { trim: false }), chunks[0]);

    let cancel_style = if confirm.selection == ConfirmSelection::Cancel {
        Style::default()
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let clear_base = Style::default().fg(Color::Red);
    let clear_style = if confirm.selection == ConfirmSelection::Clear {
        clear_base
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD)
    } else {
        clear_base.add_modifier(Modifier::BOLD)
    };

    let buttons = Paragraph::new(Line::from(vec![
        Span::styled("[ Cancel ]", cancel_style),
        Span::raw("   "),
        Span::styled("[ Clear ]", clear_style),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(buttons, chunks[1]);

    let hint = Paragraph::new("Keys: ←/→ choose  Enter confirm  Esc cancel  y/n")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, chunks[2]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
