// src/platform/keyboard.rs
//! Global key state sampling and synthetic key presses through CoreGraphics

#![allow(non_camel_case_types, non_upper_case_globals)]

use std::os::raw::c_void;
use std::ptr;

use core_foundation::base::CFRelease;
use tracing::trace;

use crate::core::input_types::{Hotkey, HotkeySource};
use crate::error::InputError;

type CGEventRef = *mut c_void;
type CGEventSourceRef = *mut c_void;
type CGEventSourceStateID = i32;
type CGEventTapLocation = u32;
type CGKeyCode = u16;

const kCGEventSourceStateHIDSystemState: CGEventSourceStateID = 1;
const kCGHIDEventTap: CGEventTapLocation = 0;

// Virtual key codes from HIToolbox/Events.h
const kVK_ANSI_C: CGKeyCode = 0x08;
const kVK_ANSI_Q: CGKeyCode = 0x0C;
const kVK_CapsLock: CGKeyCode = 0x39;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct CGEventFlags: u64 {
        const kCGEventFlagMaskCommand = 0x0010_0000;
    }
}

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventSourceKeyState(state_id: CGEventSourceStateID, key: CGKeyCode) -> bool;
    fn CGEventCreateKeyboardEvent(
        source: CGEventSourceRef,
        virtual_key: CGKeyCode,
        key_down: bool,
    ) -> CGEventRef;
    fn CGEventSetFlags(event: CGEventRef, flags: u64);
    fn CGEventPost(tap: CGEventTapLocation, event: CGEventRef);
}

/// Samples Caps Lock (toggle) and Q (exit) from the hardware key state.
/// Needs no event tap, so it keeps working while other apps have focus.
#[derive(Debug, Default)]
pub struct GlobalHotkeys;

impl GlobalHotkeys {
    pub fn new() -> Self {
        Self
    }

    fn key_code(key: Hotkey) -> CGKeyCode {
        match key {
            Hotkey::Toggle => kVK_CapsLock,
            Hotkey::Exit => kVK_ANSI_Q,
        }
    }
}

impl HotkeySource for GlobalHotkeys {
    fn is_down(&mut self, key: Hotkey) -> bool {
        unsafe { CGEventSourceKeyState(kCGEventSourceStateHIDSystemState, Self::key_code(key)) }
    }
}

/// Post Cmd+C to whatever application has keyboard focus
pub fn post_copy_shortcut() -> Result<(), InputError> {
    post_key_with_flags(kVK_ANSI_C, CGEventFlags::kCGEventFlagMaskCommand)
}

fn post_key_with_flags(key: CGKeyCode, flags: CGEventFlags) -> Result<(), InputError> {
    for key_down in [true, false] {
        unsafe {
            let event = CGEventCreateKeyboardEvent(ptr::null_mut(), key, key_down);
            if event.is_null() {
                return Err(InputError::EventCreation { key });
            }
            CGEventSetFlags(event, flags.bits());
            CGEventPost(kCGHIDEventTap, event);
            CFRelease(event as _);
        }
    }
    trace!("Posted key {:#04x} with flags {:?}", key, flags);
    Ok(())
}
