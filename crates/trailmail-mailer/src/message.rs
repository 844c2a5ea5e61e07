//! Outgoing message builders: the per-recipient promotional email and the
//! admin report that carries the run log as an attachment.

use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use std::path::Path;

use trailmail_core::error::{Result, TrailmailError};
use trailmail_core::recipients::Recipient;

/// Build the personalized promotional email for one recipient.
pub fn campaign_message(
    from: &Mailbox,
    recipient: &Recipient,
    brand_name: &str,
    site_url: &str,
) -> Result<Message> {
    let to: Mailbox = recipient
        .email
        .parse()
        .map_err(|e| TrailmailError::Smtp(format!("Invalid recipient address: {e}")))?;

    let subject = format!("Join Our {} – Your Adventure Awaits!", recipient.trip_name);
    let body = campaign_body(recipient, brand_name, site_url);

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(subject)
        .multipart(
            MultiPart::alternative().singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(body),
            ),
        )
        .map_err(|e| TrailmailError::Smtp(format!("Build email: {e}")))
}

/// Build the admin report email. The run log is attached when it exists;
/// a missing log is logged and the report goes out without it.
pub fn report_message(
    from: &Mailbox,
    admin_email: &str,
    brand_name: &str,
    log_path: &Path,
) -> Result<Message> {
    let to: Mailbox = admin_email
        .parse()
        .map_err(|e| TrailmailError::Smtp(format!("Invalid admin address: {e}")))?;

    let body = format!(
        "Hello,\n\n\
         Please find attached the log file for the latest email campaign execution.\n\n\
         Best regards,\n\
         {brand_name} Automated System\n"
    );

    let mut multipart = MultiPart::mixed().singlepart(
        SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(body),
    );

    if log_path.is_file() {
        let bytes = std::fs::read(log_path)?;
        let filename = log_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "email_campaign.log".into());
        let content_type = ContentType::parse("application/octet-stream")
            .map_err(|e| TrailmailError::Smtp(format!("Attachment content type: {e}")))?;
        multipart = multipart.singlepart(Attachment::new(filename).body(bytes, content_type));
    } else {
        tracing::error!(
            "Log file not found at {}. Cannot attach to report email.",
            log_path.display()
        );
    }

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(format!("{brand_name} - Email Campaign Logs"))
        .multipart(multipart)
        .map_err(|e| TrailmailError::Smtp(format!("Build report: {e}")))
}

/// Format a trip cost as US dollars with thousands separators, two decimals.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let rem = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{rem:02}")
}

fn campaign_body(recipient: &Recipient, brand_name: &str, site_url: &str) -> String {
    format!(
        r#"<html>
<body>
    <p>Hi {name},</p>
    <p>
        Are you ready for an unforgettable adventure? We at
        <strong>{brand}</strong> are excited to invite you to our upcoming
        <strong>{trip}</strong> on
        <strong>{date}</strong>.
    </p>
    <p>
        <strong>Trip Highlights:</strong><br>
        {description}<br>
        <strong>Cost:</strong> ${cost}
    </p>
    <p>
        We promise breathtaking views, expert guides, and memories that will last a lifetime.
    </p>
    <p>
        <a href="{site}"
           style="
               display: inline-block;
               padding: 12px 20px;
               font-size: 16px;
               color: #ffffff;
               background-color: #006400;
               text-decoration: none;
               border-radius: 5px;
               margin: 10px 0;
           ">
            Book Your Adventure Now
        </a>
    </p>
    <p>
        If you have any questions or need more information,
        feel free to reply to this email or visit our website:
        <a href="{site}" style="color: #1a0dab; text-decoration: none;">{brand}</a>.
    </p>
    <p>
        We look forward to exploring with you!<br><br>
        Best regards,<br>
        The {brand} Team
    </p>
</body>
</html>
"#,
        name = recipient.name,
        brand = brand_name,
        trip = recipient.trip_name,
        date = recipient.trip_date,
        description = recipient.trip_description,
        cost = format_usd(recipient.trip_cost),
        site = site_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient {
            email: "kai@example.com".into(),
            name: "Kai".into(),
            trip_name: "Annapurna Base Camp Trek".into(),
            trip_date: "2026-10-12".into(),
            trip_cost: 1499.5,
            trip_description: "10 days, guided, all meals included.".into(),
        }
    }

    fn sender() -> Mailbox {
        "All Packers Expeditions <trips@example.com>".parse().unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1499.5), "1,499.50");
        assert_eq!(format_usd(0.0), "0.00");
        assert_eq!(format_usd(25.0), "25.00");
        assert_eq!(format_usd(1_234_567.891), "1,234,567.89");
        assert_eq!(format_usd(999.999), "1,000.00");
    }

    #[test]
    fn test_campaign_message_headers() {
        let msg = campaign_message(
            &sender(),
            &recipient(),
            "All Packers Expeditions",
            "https://allpackersexpeditions.com/",
        )
        .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("To: kai@example.com"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_campaign_body_is_personalized() {
        let body = campaign_body(
            &recipient(),
            "All Packers Expeditions",
            "https://allpackersexpeditions.com/",
        );
        assert!(body.contains("Hi Kai,"));
        assert!(body.contains("<strong>Annapurna Base Camp Trek</strong>"));
        assert!(body.contains("<strong>2026-10-12</strong>"));
        assert!(body.contains("$1,499.50"));
        assert!(body.contains("https://allpackersexpeditions.com/"));
    }

    #[test]
    fn test_campaign_message_rejects_bad_address() {
        let mut r = recipient();
        r.email = "nope".into();
        assert!(campaign_message(&sender(), &r, "Brand", "https://example.com/").is_err());
    }

    #[test]
    fn test_report_message_with_attachment() {
        let dir = std::env::temp_dir().join("trailmail-test-report");
        std::fs::create_dir_all(&dir).unwrap();
        let log = dir.join("email_campaign.log");
        std::fs::write(&log, "2026-08-03 06:00:01 INFO campaign started\n").unwrap();

        let msg = report_message(&sender(), "admin@example.com", "All Packers Expeditions", &log)
            .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("To: admin@example.com"));
        assert!(raw.contains("All Packers Expeditions - Email Campaign Logs"));
        assert!(raw.contains("email_campaign.log"));
        assert!(raw.contains("multipart/mixed"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_report_message_without_log_still_builds() {
        let msg = report_message(
            &sender(),
            "admin@example.com",
            "All Packers Expeditions",
            Path::new("/nonexistent/email_campaign.log"),
        )
        .unwrap();
        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Please find attached"));
    }
}
