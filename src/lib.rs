pub mod adapters;
pub mod chemistry;
pub mod error;
pub mod gas;
pub mod models;
pub mod table;

pub use crate::chemistry::{Gas, henry_constant, round_sig};
pub use crate::error::AppError;
pub use crate::gas::calc_all;
pub use crate::gas::concentration::{HeadspaceSample, calc_dissolved_conc, dissolved_concentration};
pub use crate::gas::saturation::{calc_sat, percent_saturation, saturation_concentration};
pub use crate::models::{ColumnMap, Role, Source};
pub use crate::table::{Input, SampleTable};
