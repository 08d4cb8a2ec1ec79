//! Statistical utilities for the playcall project.
//!
//! This crate provides the numeric building blocks used by the decision tree
//! engine, without any knowledge of football:
//!
//! - **Descriptive statistics**: Truncating integer mean and standard deviation
//! - **Percentiles**: Nearest-rank percentiles over sorted integer samples
//! - **Information theory**: Entropy, information gain, intrinsic value and gain ratio
//!
//! # Modules
//!
//! - [`descriptive`]: Integer descriptive statistics for summarizing samples
//! - [`percentiles`]: Percentile computation and storage
//! - [`entropy`]: Entropy and information gain ratio over count tables
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use playcall_stats::descriptive::IntegerStats;
//!
//! let stats = IntegerStats::new([3, 7, -2, 12]).unwrap();
//! assert_eq!(stats.mean, 5);
//! assert_eq!(stats.std_dev, 5);
//! ```
//!
//! ## Computing percentiles
//!
//! ```
//! use playcall_stats::percentiles::Percentiles;
//!
//! let percentiles = Percentiles::new(&[1, 2, 3, 4, 5], &[25.0, 50.0, 75.0]);
//! assert_eq!(percentiles.get(50.0), Some(3));
//! ```
//!
//! ## Scoring a split
//!
//! ```
//! use playcall_stats::entropy::InformationGain;
//!
//! // Two classes, perfectly separated into two groups
//! let groups = [vec![2, 0], vec![0, 2]];
//! let gain = InformationGain::from_groups(&groups).unwrap();
//! assert_eq!(gain.ratio(), 1.0);
//! ```

pub mod descriptive;
pub mod entropy;
pub mod percentiles;
