//! Migration trait definition

/// Trait that all migrations must implement
///
/// Each migration file should define a struct named `Version{identifier}` that
/// implements this trait. Tideline only discovers and orders implementations;
/// running the statements they return is the job of the migration runner.
pub trait Migration: Send + Sync {
    /// Human-readable summary shown by tooling
    fn description(&self) -> &str {
        ""
    }

    /// Statements that apply the migration (forward migration)
    fn up(&self) -> Vec<String>;

    /// Statements that roll the migration back
    ///
    /// Note: This is optional - migrations returning no statements
    /// cannot be rolled back.
    fn down(&self) -> Vec<String> {
        Vec::new()
    }
}
