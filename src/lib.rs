//! rust-gradebook - 学校作业与成绩管理后端服务
//!
//! 基于 Actix Web 构建，负责作业布置、学生提交、评分与成绩汇总。
//! 身份认证由上游网关完成，本服务通过 `X-User-Id` 请求头识别当前用户。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 当前用户与角色校验中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（含成绩汇总）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
