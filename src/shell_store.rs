//! Page-wide shell state. Listeners see `(old, new)` after the borrow is
//! released, so they may read or update the store again.

use std::cell::RefCell;
use std::rc::Rc;

use player_shell_core::ShellState;

type StateListener = Rc<dyn Fn(&ShellState, &ShellState)>;

thread_local! {
    static SHELL_STATE: RefCell<ShellState> = RefCell::new(ShellState::default());
    static LISTENERS: RefCell<Vec<(u64, StateListener)>> = RefCell::new(Vec::new());
    static NEXT_LISTENER_ID: RefCell<u64> = RefCell::new(1);
}

pub(crate) fn shell_state() -> ShellState {
    SHELL_STATE.with(|state| state.borrow().clone())
}

pub(crate) fn update_shell_state<F>(update: F)
where
    F: FnOnce(&mut ShellState),
{
    let change = SHELL_STATE.with(|state| {
        let mut state = state.borrow_mut();
        let old = state.clone();
        update(&mut *state);
        if *state == old {
            return None;
        }
        Some((old, state.clone()))
    });
    let Some((old, new)) = change else {
        return;
    };
    let listeners: Vec<StateListener> = LISTENERS.with(|listeners| {
        listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect()
    });
    for listener in listeners {
        listener(&old, &new);
    }
}

pub(crate) fn add_state_listener(listener: StateListener) -> u64 {
    LISTENERS.with(|listeners| {
        let id = NEXT_LISTENER_ID.with(|next| {
            let mut next = next.borrow_mut();
            let id = *next;
            *next = next.saturating_add(1);
            id
        });
        listeners.borrow_mut().push((id, listener));
        id
    })
}

pub(crate) fn remove_state_listener(id: u64) {
    LISTENERS.with(|listeners| {
        listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
    });
}
