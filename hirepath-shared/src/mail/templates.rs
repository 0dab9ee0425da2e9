/// HTML email bodies
///
/// Every user-supplied value goes through [`escape_html`] before it is
/// interpolated.

use super::OutgoingEmail;
use rust_decimal::Decimal;

/// Escapes text for inclusion in HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .button {{ display: inline-block; padding: 10px 18px; border-radius: 4px; color: #fff; text-decoration: none; }}
        .validate {{ background: #2e7d32; }}
        .reject {{ background: #c62828; }}
        .footer {{ margin-top: 30px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>{title}</h2>
{content}
        <div class="footer">
            <p>This is an automated message from HirePath, please do not reply to this email.</p>
        </div>
    </div>
</body>
</html>"#
    )
}

/// Welcome message sent after registration
pub fn welcome(to: &str, first_name: &str, frontend_url: &str) -> OutgoingEmail {
    let name = escape_html(first_name);
    let content = format!(
        r#"        <p>Hello {name},</p>
        <p>Your HirePath account was created. Steps 1 and 2 of your application are complete.</p>
        <p>Next, upload your documents from your dashboard so the recruitment office can review them.</p>
        <p><a href="{frontend_url}/dashboard">Open my dashboard</a></p>"#
    );

    OutgoingEmail::html(to, "Welcome to HirePath", layout("Welcome to HirePath", &content))
}

/// Password reset link, valid for `lifetime_minutes`
pub fn password_reset(to: &str, first_name: &str, reset_link: &str, lifetime_minutes: i64) -> OutgoingEmail {
    let name = escape_html(first_name);
    let link = escape_html(reset_link);
    let content = format!(
        r#"        <p>Hello {name},</p>
        <p>We received a request to reset your password. If you didn't make this request, you can safely ignore this email.</p>
        <p><a href="{link}">Reset your password</a></p>
        <p>Or copy and paste this link into your browser:</p>
        <p>{link}</p>
        <p>This link expires in {lifetime_minutes} minutes and can be used once.</p>"#
    );

    OutgoingEmail::html(to, "Password Reset Request", layout("Password Reset Request", &content))
}

/// Details of an uploaded document for the recruitment office
#[derive(Debug, Clone)]
pub struct DocumentReview<'a> {
    pub candidate_name: &'a str,
    pub candidate_email: &'a str,
    pub document_name: &'a str,
    pub original_filename: &'a str,
    pub validate_link: &'a str,
    pub reject_link: &'a str,
}

/// Review request with one-click validate and reject links
///
/// The caller attaches the uploaded file.
pub fn document_review(to: &str, review: &DocumentReview<'_>) -> OutgoingEmail {
    let content = format!(
        r#"        <p>{candidate} ({email}) uploaded a new document.</p>
        <p><strong>Document:</strong> {document}<br><strong>File:</strong> {file}</p>
        <p>The file is attached to this email.</p>
        <p>
            <a class="button validate" href="{validate}">Validate</a>
            <a class="button reject" href="{reject}">Reject</a>
        </p>"#,
        candidate = escape_html(review.candidate_name),
        email = escape_html(review.candidate_email),
        document = escape_html(review.document_name),
        file = escape_html(review.original_filename),
        validate = escape_html(review.validate_link),
        reject = escape_html(review.reject_link),
    );

    OutgoingEmail::html(
        to,
        format!("New document from {}", review.candidate_name),
        layout("Document review", &content),
    )
}

/// Payment details a candidate submitted to the recruitment office
pub fn payment_submitted(
    to: &str,
    candidate_name: &str,
    candidate_email: &str,
    description: &str,
    amount: Decimal,
    currency: &str,
) -> OutgoingEmail {
    let content = format!(
        r#"        <p>{candidate} ({email}) reports a payment.</p>
        <p><strong>Description:</strong> {description}<br><strong>Amount:</strong> {amount} {currency}</p>
        <p>Mark the payment as paid once the funds are received.</p>"#,
        candidate = escape_html(candidate_name),
        email = escape_html(candidate_email),
        description = escape_html(description),
        currency = escape_html(currency),
    );

    OutgoingEmail::html(
        to,
        format!("Payment submitted by {}", candidate_name),
        layout("Payment submitted", &content),
    )
}

/// Tells the candidate a document was rejected and must be uploaded again
pub fn document_rejected(to: &str, first_name: &str, document_name: &str) -> OutgoingEmail {
    let content = format!(
        r#"        <p>Hello {name},</p>
        <p>Your document <strong>{document}</strong> could not be accepted. Please upload a new version from your dashboard.</p>"#,
        name = escape_html(first_name),
        document = escape_html(document_name),
    );

    OutgoingEmail::html(to, "Document rejected", layout("Document rejected", &content))
}
