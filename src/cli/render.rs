//! Plain-text rendering of portal pages for the terminal.

use std::fmt::Write;

use crate::cli::utils::format_size;
use crate::portal::{DocumentEntry, PortalPage, PortalView, StepState};

const BAR_WIDTH: usize = 20;

pub fn portal_page(page: &PortalPage) -> String {
    match page {
        PortalPage::Denied { message, home_link } => format!("{}\nReturn home: {}\n", message, home_link),
        PortalPage::Ready(view) => portal_view(view),
    }
}

pub fn progress_bar(progress: u8) -> String {
    let filled = (progress.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}] {:>3}%", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled), progress)
}

fn portal_view(view: &PortalView) -> String {
    let mut out = String::new();
    let o = &view.overview;

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", o.greeting);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", o.job_title);
    if let Some(address) = &o.address {
        let _ = writeln!(out, "  {}", address);
    }
    if let Some(label) = &o.stage_label {
        let _ = writeln!(out, "  Stage: {}", label);
    }
    let _ = writeln!(out, "  {}", progress_bar(o.progress));
    match (o.start_date, o.end_date) {
        (Some(start), Some(end)) => {
            let _ = writeln!(out, "  Schedule: {} to {}", start, end);
        }
        (Some(start), None) => {
            let _ = writeln!(out, "  Starts: {}", start);
        }
        _ => {}
    }
    let _ = writeln!(out, "  Contract: {}", o.contract_summary);
    let _ = writeln!(out, "  Quote: {}", o.quote_summary);
    if o.outstanding_invoices > 0 {
        let _ = writeln!(out, "  Outstanding: {} invoice(s), {} due", o.outstanding_invoices, o.outstanding_total);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Timeline");
    for step in &view.timeline {
        let marker = match step.state {
            StepState::Done => "[x]",
            StepState::Current => "[>]",
            StepState::Upcoming => "[ ]",
        };
        let _ = writeln!(out, "  {} {}", marker, step.label);
    }

    if !view.documents.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Documents");
        for doc in &view.documents {
            let _ = writeln!(out, "  {}", document_line(doc));
        }
    }

    if !view.photos.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Photos");
        for photo in &view.photos {
            let _ = writeln!(out, "  {}  {}", photo.label, photo.url);
        }
    }

    out
}

fn document_line(doc: &DocumentEntry) -> String {
    match doc {
        DocumentEntry::Quote { title, status } => format!("Quote: {} ({})", title, status.as_str()),
        DocumentEntry::Contract { signed_by: Some(name), .. } => format!("Contract: signed by {}", name),
        DocumentEntry::Contract { .. } => "Contract: awaiting signature".to_string(),
        DocumentEntry::Invoice {
            number,
            status,
            amount,
            due_date,
        } => {
            let due = due_date.map(|d| format!(", due {}", d)).unwrap_or_default();
            format!("Invoice {}: {} ({:?}{})", number, amount, status, due)
        }
        DocumentEntry::File { label, url, size, .. } => format!("{} ({})  {}", label, format_size(*size), url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStage;
    use crate::portal::PortalPayload;
    use crate::testing;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), format!("[{}]   0%", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]  50%", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "#".repeat(20)));
    }

    #[test]
    fn denied_page_shows_message_and_home_link() {
        let page = PortalPage::Denied {
            message: "This portal link is invalid or has expired.".to_string(),
            home_link: "/".to_string(),
        };
        let text = portal_page(&page);
        assert!(text.contains("invalid or has expired"));
        assert!(text.contains("Return home: /"));
    }

    #[test]
    fn ready_page_renders_timeline_markers() {
        let contact = testing::contact(Some("dana@example.com"));
        let job = testing::job(contact.id, JobStage::InProgress);
        let payload = PortalPayload {
            contact: Some(contact),
            job: Some(job),
            ..Default::default()
        };
        let page = PortalPage::Ready(PortalView::from_payload(&payload));
        let text = portal_page(&page);

        assert!(text.contains("Welcome, Dana Whitfield"));
        assert!(text.contains("[x] Materials Ordered"));
        assert!(text.contains("[>] In Progress"));
        assert!(text.contains("[ ] Complete"));
        assert!(text.contains(" 50%"));
    }
}
