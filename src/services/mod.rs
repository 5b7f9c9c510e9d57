// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod trainings;
pub mod users;

pub use trainings::TrainingService;
pub use users::UserService;
