//! Fake data helpers for tests.

/// Helper functions for generating fake test data.
pub mod fake {
    use uuid::Uuid;

    /// Generate a fake email address.
    pub fn email() -> String {
        format!("test-{}@example.com", Uuid::new_v4().simple())
    }

    /// Generate a fake UUID as a string.
    pub fn uuid() -> String {
        Uuid::new_v4().to_string()
    }

    /// Generate a fake display name.
    pub fn name() -> String {
        format!("Test Org {}", &Uuid::new_v4().simple().to_string()[..8])
    }

    /// Generate a fake URL-safe slug.
    pub fn slug() -> String {
        format!("org-{}", &Uuid::new_v4().simple().to_string()[..12])
    }

    /// Generate a fake invoice number.
    pub fn invoice_number() -> String {
        format!("INV-{:06}", fastrand::u32(0..999999))
    }

    /// Generate a random amount between min and max.
    pub fn amount(min: i32, max: i32) -> f64 {
        f64::from(fastrand::i32(min..=max))
    }
}
