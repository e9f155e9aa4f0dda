use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{App, Phase};
use crate::image::EncodedImage;
use crate::profile::{ProfileField, ProfileForm, UserProfile};
use crate::report::HealthReport;
use crate::theme::{colors, risk_color, scanline_frame, spinner_frame, styles};

/// Main draw function: exactly one view per phase, plus the status bar.
pub fn draw(frame: &mut Frame, app: &App) {
    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Phase view
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match app.phase() {
        Phase::Splash { .. } => draw_splash(frame, app, chunks[0]),
        Phase::Auth(form) => draw_auth(frame, form, chunks[0]),
        Phase::Dashboard => draw_dashboard(frame, app, chunks[0]),
        Phase::Scanning { .. } => draw_scanning(frame, app, chunks[0]),
        Phase::Analyzing { image, .. } => draw_analyzing(frame, app, image, chunks[0]),
        Phase::Results { image, report } => draw_results(frame, image, report, chunks[0]),
    }

    draw_status_bar(frame, app, chunks[1]);
}

/// Center a fixed-size box inside `area`, clamped to it.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn hint_line(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, action) in pairs {
        spans.push(Span::styled(format!(" {key}"), styles::key_highlight()));
        spans.push(Span::styled(format!(" {action} "), styles::key_hint()));
    }
    Line::from(spans)
}

fn draw_splash(frame: &mut Frame, app: &App, area: Rect) {
    // Pulse the tagline with the tick counter.
    let pulse = if app.tick_count() / 4 % 2 == 0 {
        Style::default().fg(colors::PRIMARY)
    } else {
        Style::default().fg(colors::PRIMARY_DIM)
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("   ◉   ", pulse)).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("I R I S C A N", styles::title())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("EYE SCAN · NEURAL HEALTH SCREENING", pulse))
            .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("System initializing...", styles::subtitle()))
            .alignment(Alignment::Center),
    ];

    let splash = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(splash, centered_rect(area, 44, 10));
}

fn draw_auth(frame: &mut Frame, form: &ProfileForm, area: Rect) {
    let box_area = centered_rect(area, 52, 16);

    let field_line = |field: ProfileField, value: &str, cursor: Option<usize>| -> Vec<Line<'static>> {
        let focused = form.focus() == field;
        let label_style = if focused {
            styles::field_focused()
        } else {
            styles::field_blurred()
        };
        let marker = if focused { "▸ " } else { "  " };
        let required = if field == ProfileField::Phone { " *" } else { "" };

        let mut value_span = value.to_string();
        if focused && let Some(cursor) = cursor {
            // Visible cursor block inside the focused text field.
            let byte = value_span
                .char_indices()
                .map(|(i, _)| i)
                .nth(cursor)
                .unwrap_or(value_span.len());
            value_span.insert(byte, '▏');
        }

        vec![
            Line::from(vec![
                Span::styled(marker.to_string(), label_style),
                Span::styled(format!("{}{required}", field.label()), label_style),
            ]),
            Line::from(vec![
                Span::raw("    "),
                Span::styled(value_span, Style::default().fg(colors::TEXT_PRIMARY)),
            ]),
            Line::from(""),
        ]
    };

    let gender_value = form
        .gender
        .map_or_else(|| "— (any key to cycle)".to_string(), |g| g.as_str().to_string());

    let mut lines = Vec::new();
    lines.extend(field_line(
        ProfileField::Name,
        form.name.text(),
        Some(form.name.cursor()),
    ));
    lines.extend(field_line(
        ProfileField::Age,
        form.age.text(),
        Some(form.age.cursor()),
    ));
    lines.extend(field_line(ProfileField::Gender, &gender_value, None));
    lines.extend(field_line(
        ProfileField::Phone,
        form.phone.text(),
        Some(form.phone.cursor()),
    ));

    let submit_hint = if form.is_complete() {
        Span::styled("Enter to continue", styles::accent())
    } else {
        Span::styled("Phone number required", Style::default().fg(colors::YELLOW))
    };
    lines.push(Line::from(submit_hint).alignment(Alignment::Center));

    let auth = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors::PRIMARY_DIM))
            .title(Line::from(Span::styled(" Create Profile ", styles::title())))
            .title_bottom(hint_line(&[("Tab", "next field"), ("Enter", "submit")]).right_aligned())
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(auth, box_area);
}

fn draw_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Scan card
        ])
        .split(area);

    draw_dashboard_header(frame, app.profile(), chunks[0]);

    let card_area = centered_rect(chunks[1], 54, 11);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Biometric Scan", styles::title())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            "Retinal patterns are analyzed to estimate your",
            styles::subtitle(),
        ))
        .alignment(Alignment::Center),
        Line::from(Span::styled(
            "current health status.",
            styles::subtitle(),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            "Ensure good lighting for accurate analysis.",
            Style::default().fg(colors::TEXT_SECONDARY),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(vec![
            Span::styled("▶ START DIAGNOSIS", styles::accent()),
            Span::styled("  (s)", styles::key_hint()),
        ])
        .alignment(Alignment::Center),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors::PRIMARY_DIM))
            .title_bottom(hint_line(&[("s", "scan"), ("q", "quit")]).right_aligned()),
    );
    frame.render_widget(card, card_area);
}

fn draw_dashboard_header(frame: &mut Frame, profile: Option<&UserProfile>, area: Rect) {
    let (greeting, id, badge) = profile.map_or_else(
        || ("Hello, User".to_string(), "ID: ####".to_string(), "?"),
        |profile| {
            (
                format!("Hello, {}", profile.display_name()),
                format!("ID: {}", profile.id_suffix()),
                profile.gender.map_or("AI", |g| g.badge()),
            )
        },
    );

    let lines = vec![
        Line::from(vec![
            Span::styled(greeting, styles::title()),
            Span::raw("   "),
            Span::styled(format!(" {badge} "), styles::badge(colors::PRIMARY)),
        ]),
        Line::from(Span::styled(id, styles::subtitle())),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_scanning(frame: &mut Frame, app: &App, area: Rect) {
    let finder_area = centered_rect(area, 40, 13);

    let scanline = scanline_frame(app.tick_count());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("┌─          ─┐", styles::accent())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("( ◉ )", Style::default().fg(colors::TEXT_PRIMARY)))
            .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled("└─          ─┘", styles::accent())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(scanline, Style::default().fg(colors::PRIMARY)))
            .alignment(Alignment::Center),
        Line::from(""),
        if app.capture_in_flight() {
            Line::from(Span::styled(
                format!("{} Capturing frame", spinner_frame(app.tick_count())),
                Style::default().fg(colors::PRIMARY),
            ))
            .alignment(Alignment::Center)
        } else {
            Line::from(Span::styled(
                "Align your eye with the frame",
                styles::subtitle(),
            ))
            .alignment(Alignment::Center)
        },
    ];

    let finder = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors::PRIMARY))
            .title(Line::from(Span::styled(" Scanner ", styles::title())))
            .title_bottom(hint_line(&[("Enter", "capture"), ("Esc", "cancel")]).right_aligned()),
    );
    frame.render_widget(finder, finder_area);
}

fn draw_analyzing(frame: &mut Frame, app: &App, image: &EncodedImage, area: Rect) {
    let box_area = centered_rect(area, 48, 9);

    let spinner = spinner_frame(app.tick_count());
    let payload_kb = image.as_str().len() / 1024;

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(spinner, Style::default().fg(colors::PRIMARY)),
            Span::styled(" Analyzing neural patterns", styles::title()),
        ])
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            format!("frame {} · {payload_kb} KB", image.mime_type()),
            styles::subtitle(),
        ))
        .alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            format!("Connecting to {} ...", app.model_name()),
            styles::subtitle(),
        ))
        .alignment(Alignment::Center),
    ];

    let analyzing = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors::PRIMARY_DIM)),
    );
    frame.render_widget(analyzing, box_area);
}

fn draw_results(frame: &mut Frame, image: &EncodedImage, report: &HealthReport, area: Rect) {
    let accent = risk_color(report.risk_level);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", report.risk_level.as_str().to_uppercase()),
                styles::badge(accent),
            ),
            Span::raw("  "),
            Span::styled(report.condition_name.clone(), styles::title()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Captured frame: {} · {} KB",
                image.mime_type(),
                image.as_str().len() / 1024
            ),
            styles::subtitle(),
        )),
        Line::from(""),
        Line::from(Span::styled(report.description.clone(), Style::default().fg(colors::TEXT_PRIMARY))),
        Line::from(""),
        Line::from(Span::styled("Neural body analysis", section_header())),
        Line::from(Span::styled(
            report.neural_body_analysis.clone(),
            Style::default().fg(colors::TEXT_SECONDARY),
        )),
    ];

    if !report.health_issues.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Health issues", section_header())));
        for issue in &report.health_issues {
            lines.push(bullet(issue, colors::YELLOW));
        }
    }

    if !report.precautions.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Precautions", section_header())));
        for precaution in &report.precautions {
            lines.push(bullet(precaution, colors::GREEN));
        }
    }

    if !report.diet_menu.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Diet menu", section_header())));
        for entry in &report.diet_menu {
            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(colors::PURPLE)),
                Span::styled(entry.item.clone(), Style::default().fg(colors::TEXT_PRIMARY)),
                Span::styled(
                    format!(" — {}", entry.reason),
                    Style::default().fg(colors::TEXT_MUTED),
                ),
            ]));
        }
    }

    let title = if report.is_fallback() {
        Span::styled(" Analysis Unavailable ", Style::default().fg(colors::RED))
    } else {
        Span::styled(" Scan Report ", styles::title())
    };

    let results = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(accent))
                .title(Line::from(title))
                .title_bottom(hint_line(&[("r", "new scan"), ("q", "quit")]).right_aligned())
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(results, area.inner(ratatui::layout::Margin::new(1, 1)));
}

fn section_header() -> Style {
    Style::default()
        .fg(colors::PRIMARY)
        .add_modifier(Modifier::BOLD)
}

fn bullet(text: &str, dot: ratatui::style::Color) -> Line<'static> {
    Line::from(vec![
        Span::styled("  • ", Style::default().fg(dot)),
        Span::styled(text.to_string(), Style::default().fg(colors::TEXT_SECONDARY)),
    ])
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (status_text, status_style) = if let Some(message) = app.status_message() {
        (message.to_string(), Style::default().fg(colors::YELLOW))
    } else if app.has_api_key() {
        (
            format!("● {}", app.model_name()),
            Style::default().fg(colors::GREEN),
        )
    } else {
        (
            "○ No API key │ Set GEMINI_API_KEY".to_string(),
            Style::default().fg(colors::RED),
        )
    };

    let capture_str = app.capture_source().describe();
    let capture_width = capture_str.len() as u16 + 2;

    let status_area = Rect {
        width: area.width.saturating_sub(capture_width),
        ..area
    };
    let capture_area = Rect {
        x: area.x + area.width.saturating_sub(capture_width),
        width: capture_width,
        ..area
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status_text, status_style),
    ]));
    frame.render_widget(status, status_area);

    let capture = Paragraph::new(Line::from(vec![
        Span::styled(capture_str, styles::subtitle()),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(capture, capture_area);
}
