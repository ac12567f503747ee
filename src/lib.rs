//! 倉庫の靴下在庫台帳
//!
//! 靴下の種類（色と綿混率）ごとの在庫数を管理し、
//! 在庫を変更するすべての入出庫を取引記録として追記する。

pub mod adapter;
pub mod application;
pub mod domain;
