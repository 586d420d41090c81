use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use thiserror::Error;

use crate::chord::Chord;

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("global hotkeys are not supported on this platform")]
    Unsupported,
    #[error("failed to initialize the global hotkey facility: {0}")]
    Init(String),
    #[error("could not claim {chord}; another application may be using it ({reason})")]
    Registration { chord: Chord, reason: String },
}

struct Entry {
    hotkey: HotKey,
    callback: Rc<dyn Fn()>,
}

/// Shared bridge state: the OS-level manager plus the dispatch table mapping
/// registration ids to callbacks. One instance per bridge, created at
/// startup; the manager itself is only created on first registration.
struct BridgeShared {
    manager: OnceCell<GlobalHotKeyManager>,
    callbacks: RefCell<HashMap<u32, Entry>>,
}

impl BridgeShared {
    fn manager(&self) -> Result<&GlobalHotKeyManager, HotkeyError> {
        if let Some(manager) = self.manager.get() {
            return Ok(manager);
        }
        let manager =
            GlobalHotKeyManager::new().map_err(|e| HotkeyError::Init(e.to_string()))?;
        Ok(self.manager.get_or_init(|| manager))
    }
}

/// System-wide hotkey bridge.
///
/// Owns the process-wide claim table. Registrations return RAII handles;
/// `pump` must be called from the thread that owns native input events, and
/// callbacks fire synchronously on that thread.
///
/// The bridge is deliberately not `Send`: it lives on the thread that pumps
/// it, which is the same thread the platform delivers hotkey events to.
pub struct HotkeyBridge {
    shared: Rc<BridgeShared>,
}

impl HotkeyBridge {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(BridgeShared {
                manager: OnceCell::new(),
                callbacks: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// False on platforms without a native global-hotkey facility.
    pub fn is_supported() -> bool {
        cfg!(any(target_os = "windows", target_os = "macos", target_os = "linux"))
    }

    /// Claim `chord` system-wide and invoke `callback` on every press.
    ///
    /// An OS refusal (typically another process holding the combination) is
    /// returned as `HotkeyError::Registration` and is recoverable; callers
    /// should surface it and continue without the global hotkey.
    pub fn register(
        &self,
        chord: Chord,
        callback: impl Fn() + 'static,
    ) -> Result<HotkeyHandle, HotkeyError> {
        if !Self::is_supported() {
            return Err(HotkeyError::Unsupported);
        }

        let manager = self.shared.manager()?;
        let hotkey = chord.to_hotkey();
        manager
            .register(hotkey)
            .map_err(|e| HotkeyError::Registration {
                chord,
                reason: e.to_string(),
            })?;

        let id = hotkey.id();
        self.shared.callbacks.borrow_mut().insert(
            id,
            Entry {
                hotkey,
                callback: Rc::new(callback),
            },
        );
        tracing::debug!(%chord, id, "global hotkey registered");

        Ok(HotkeyHandle {
            id,
            hotkey,
            shared: Rc::downgrade(&self.shared),
            registered: Cell::new(true),
        })
    }

    /// Drain pending native hotkey events and dispatch their callbacks on
    /// the calling thread. Returns how many callbacks fired. Events for ids
    /// no longer in the table (races with unregistration) are swallowed.
    pub fn pump(&self) -> usize {
        let receiver = GlobalHotKeyEvent::receiver();
        let mut fired = 0;
        while let Ok(event) = receiver.try_recv() {
            if event.state != HotKeyState::Pressed {
                continue;
            }
            // Clone out of the table before invoking so a callback may
            // register or unregister without re-entering the borrow.
            let callback = self
                .shared
                .callbacks
                .borrow()
                .get(&event.id)
                .map(|entry| Rc::clone(&entry.callback));
            if let Some(callback) = callback {
                callback();
                fired += 1;
            }
        }
        fired
    }
}

impl Default for HotkeyBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Live registration of one chord.
///
/// Unregistration is idempotent and guaranteed: dropping the handle releases
/// the OS-level claim if `unregister` was never called.
pub struct HotkeyHandle {
    id: u32,
    hotkey: HotKey,
    shared: Weak<BridgeShared>,
    registered: Cell<bool>,
}

impl HotkeyHandle {
    /// Process-unique identifier of this registration.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.registered.get()
    }

    /// Release the OS claim and remove the dispatch-table entry. Calling
    /// this on an already-unregistered handle is a no-op.
    pub fn unregister(&self) {
        if !self.registered.replace(false) {
            return;
        }
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        shared.callbacks.borrow_mut().remove(&self.id);
        if let Some(manager) = shared.manager.get()
            && let Err(e) = manager.unregister(self.hotkey)
        {
            tracing::warn!(id = self.id, "failed to release hotkey claim: {e}");
        }
        tracing::debug!(id = self.id, "global hotkey unregistered");
    }
}

impl Drop for HotkeyHandle {
    fn drop(&mut self) {
        self.unregister();
    }
}
