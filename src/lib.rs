#![doc = "oncodash: core result pipeline and report engine for a model-evaluation dashboard."]

//! This crate contains the data-shape contracts, the pipeline state machine,
//! the report encoders and the remote advisory client of the dashboard.
//! Presentation (layout, charts, toast rendering) lives outside; hosts consume
//! the pipeline's state record, its notification stream and the encoders'
//! finished artifacts.
//!
//! # Usage
//! Construct a [`pipeline::Pipeline`], feed it uploads and analysis events,
//! and hand it an [`advisory::AdvisoryClient`] implementation for the two
//! remote artifact fetches (recommendations, clinical narrative).

pub mod advisory;
pub mod analysis;
pub mod config;
pub mod dataset;
pub mod export;
pub mod notify;
pub mod pipeline;
pub mod report_pdf;
