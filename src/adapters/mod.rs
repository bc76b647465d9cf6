//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod tsv_data_adapter;
pub mod tsv_report_adapter;
