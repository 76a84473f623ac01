// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A render device with no GPU behind it.
//!
//! [`HeadlessDevice`] hands out real, unique handles, validates every handle
//! it is given, tracks which resources are live and records the command
//! stream. It backs headless runs and lets tests assert on draw order and
//! resource leaks.

mod device;

pub use self::device::{DeviceCommand, HeadlessDevice};
