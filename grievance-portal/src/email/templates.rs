//! HTML email bodies for OTP delivery and submission confirmation

use chrono::{Datelike, Utc};

/// Subject and body for an OTP delivery mail.
pub fn otp_email(code: &str, ttl_minutes: i64) -> (String, String) {
    let subject = "Your OTP for Grievance Portal".to_string();
    let body = format!(
        "<html><body style='font-family: Arial, sans-serif; color: #333;'>\
         <div style='max-width: 600px; margin: 0 auto; padding: 20px;'>\
         <h1 style='color: #667eea;'>Grievance Portal</h1>\
         <p>Sri Vasavi Engineering College</p>\
         <h2>Email Verification</h2>\
         <p>Your One-Time Password (OTP) for submitting a grievance is:</p>\
         <div style='border: 2px dashed #667eea; padding: 20px; text-align: center; \
         font-size: 32px; font-weight: bold; letter-spacing: 8px;'>{code}</div>\
         <p><strong>This OTP is valid for {ttl_minutes} minutes.</strong></p>\
         <p>If you didn't request this OTP, please ignore this email.</p>\
         <p style='color: #666; font-size: 12px;'>This is an automated email. \
         Please do not reply.<br>&copy; {year} Sri Vasavi Engineering College.</p>\
         </div></body></html>",
        code = code,
        ttl_minutes = ttl_minutes,
        year = Utc::now().year(),
    );
    (subject, body)
}

/// Subject and body for the tracking-ID confirmation mail.
pub fn tracking_email(tracking_id: u64, name: &str, grievance_type: &str) -> (String, String) {
    let subject = format!("Grievance Submitted - Tracking ID: {tracking_id}");
    let body = format!(
        "<html><body style='font-family: Arial, sans-serif; color: #333;'>\
         <div style='max-width: 600px; margin: 0 auto; padding: 20px;'>\
         <h1 style='color: #667eea;'>Grievance Submitted Successfully</h1>\
         <p>Sri Vasavi Engineering College</p>\
         <h2>Dear {name},</h2>\
         <p>Your grievance has been submitted and is being reviewed.</p>\
         <div style='border: 3px solid #84bd00; padding: 20px; text-align: center;'>\
         <p style='margin: 0; color: #666; font-size: 14px;'>Your Tracking ID:</p>\
         <div style='font-size: 28px; font-weight: bold; color: #84bd00;'>{tracking_id}</div>\
         <p style='margin: 0; color: #666; font-size: 12px;'>Please save this ID for future reference</p>\
         </div>\
         <p><strong>Grievance Type:</strong> {grievance_type}<br>\
         <strong>Status:</strong> Pending Review</p>\
         <p>You can track your grievance status anytime using the tracking ID above.</p>\
         <p style='color: #666; font-size: 12px;'>This is an automated email. \
         Please do not reply.<br>&copy; {year} Sri Vasavi Engineering College.</p>\
         </div></body></html>",
        name = name,
        tracking_id = tracking_id,
        grievance_type = grievance_type,
        year = Utc::now().year(),
    );
    (subject, body)
}
