//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StatePort`]: the process state persists as one postcard
//! blob under the `incubator` namespace, tagged with a `valid` flag —
//! absence of a valid record means "first boot, use compiled-in
//! defaults".
//!
//! The wire record keeps the original firmware's conventions (enum
//! discriminants as `u8`, unset custom overrides as NaN `f32`) and the
//! in-memory [`ProcessState`] keeps the typed/`Option` forms; this module
//! converts at the boundary and coerces anything out of range that an
//! older image may have written.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{StatePort, StorageError};
use crate::process::{ControlMode, ProcessState, ProcessType};
use crate::profiles::{CUSTOM_PROFILE_ID, DEFAULT_PROFILE_ID};

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

const NVS_NAMESPACE: &str = "incubator";
const STATE_KEY: &str = "process";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 256;

// ───────────────────────────────────────────────────────────────
// Wire record
// ───────────────────────────────────────────────────────────────

/// The persisted form of [`ProcessState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub valid: bool,
    pub active: bool,
    pub control_mode: u8,
    pub process_type: u8,
    pub profile_id: u8,
    pub start_epoch: u64,
    pub start_day: u16,
    pub current_day: u16,
    pub last_turn_epoch: u64,
    pub custom_min_f: f32,
    pub custom_max_f: f32,
    pub custom_hum_min: f32,
    pub custom_hum_max: f32,
    pub custom_total_days: u16,
    pub custom_turns_per_day: u8,
}

fn opt_to_nan(v: Option<f32>) -> f32 {
    v.unwrap_or(f32::NAN)
}

fn nan_to_opt(v: f32) -> Option<f32> {
    v.is_finite().then_some(v)
}

impl StateRecord {
    pub fn from_state(state: &ProcessState) -> Self {
        Self {
            valid: true,
            active: state.active,
            control_mode: state.control_mode as u8,
            process_type: state.process_type as u8,
            profile_id: state.profile_id,
            start_epoch: state.start_epoch,
            start_day: state.start_day,
            current_day: state.current_day,
            last_turn_epoch: state.last_turn_epoch,
            custom_min_f: opt_to_nan(state.custom_min_f),
            custom_max_f: opt_to_nan(state.custom_max_f),
            custom_hum_min: opt_to_nan(state.custom_hum_min),
            custom_hum_max: opt_to_nan(state.custom_hum_max),
            custom_total_days: state.custom_total_days,
            custom_turns_per_day: state.custom_turns_per_day,
        }
    }

    /// Convert back, coercing anything a newer/older image may have left
    /// out of range rather than refusing to boot.
    pub fn into_state(self) -> ProcessState {
        let profile_id = if self.profile_id <= CUSTOM_PROFILE_ID {
            self.profile_id
        } else {
            warn!(
                "stored profile id {} out of range, coercing to default",
                self.profile_id
            );
            DEFAULT_PROFILE_ID
        };
        let control_mode =
            ControlMode::from_u8(self.control_mode).unwrap_or(ControlMode::Unmanaged);
        let process_type = ProcessType::from_u8(self.process_type).unwrap_or(ProcessType::None);
        // A record cannot be active without a real phase.
        let active = self.active && process_type != ProcessType::None;

        ProcessState {
            active,
            control_mode,
            process_type,
            profile_id,
            start_epoch: self.start_epoch,
            start_day: self.start_day,
            current_day: self.current_day,
            last_turn_epoch: self.last_turn_epoch,
            custom_min_f: nan_to_opt(self.custom_min_f),
            custom_max_f: nan_to_opt(self.custom_max_f),
            custom_hum_min: nan_to_opt(self.custom_hum_min),
            custom_hum_max: nan_to_opt(self.custom_hum_max),
            custom_total_days: self.custom_total_days,
            custom_turns_per_day: self.custom_turns_per_day,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct NvsStateStore {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsStateStore {
    /// Create the store and initialise NVS flash.
    ///
    /// On first boot or after an IDF version bump the partition is erased
    /// and re-initialised automatically.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::*;
            // SAFETY: nvs_flash_init / nvs_flash_erase run from the single
            // main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }
            info!("NvsStateStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsStateStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key() -> String {
        format!("{}::{}", NVS_NAMESPACE, STATE_KEY)
    }

    /// Open the namespace, run a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(esp_idf_svc::sys::nvs_handle_t) -> Result<T, i32>,
    {
        use esp_idf_svc::sys::*;

        let mut ns_buf = [0u8; 16];
        let ns = NVS_NAMESPACE.as_bytes();
        ns_buf[..ns.len()].copy_from_slice(ns);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl StatePort for NvsStateStore {
    fn load(&self) -> Result<Option<ProcessState>, StorageError> {
        let bytes: Option<Vec<u8>>;

        #[cfg(not(target_os = "espidf"))]
        {
            bytes = self.store.borrow().get(&Self::composite_key()).cloned();
        }

        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::*;
            let result = Self::with_nvs_handle(false, |handle| {
                let key = b"process\0";
                let mut size: usize = 0;

                let ret = unsafe {
                    nvs_get_blob(handle, key.as_ptr() as *const _, core::ptr::null_mut(), &mut size)
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Ok(None);
                }
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(Some(buf))
            });
            bytes = match result {
                Ok(b) => b,
                Err(e) => {
                    warn!("NVS read error {e}");
                    return Err(StorageError::IoError);
                }
            };
        }

        let Some(bytes) = bytes else {
            info!("no stored process state, using defaults");
            return Ok(None);
        };

        let record: StateRecord =
            postcard::from_bytes(&bytes).map_err(|_| StorageError::Corrupted)?;
        if !record.valid {
            return Ok(None);
        }
        info!("process state restored ({} bytes)", bytes.len());
        Ok(Some(record.into_state()))
    }

    fn save(&mut self, state: &ProcessState) -> Result<(), StorageError> {
        let record = StateRecord::from_state(state);
        let bytes = postcard::to_allocvec(&record).map_err(|_| StorageError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            self.store.borrow_mut().insert(Self::composite_key(), bytes);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::*;
            let result = Self::with_nvs_handle(true, |handle| {
                let key = b"process\0";
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            result.map_err(|e| {
                warn!("NVS write error {e}");
                StorageError::IoError
            })
        }
    }
}
