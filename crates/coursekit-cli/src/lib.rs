//! # Coursekit CLI
//!
//! Database seeding utilities for Coursekit testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use coursekit_cli::seeder::{SeedConfig, seed_database};
//!
//! let config = SeedConfig::new(10); // 10 courses with defaults
//! seed_database(&pool, &config).await?;
//! ```

pub mod seeder;
