//! Request-scoped identity of the authenticated principal.
//!
//! The authentication interceptor opens a [`scope`] per request and binds the
//! verified employee id into it. Services read it back with [`current`] to
//! stamp `create_user` / `update_user` without threading the id through every
//! signature. The slot lives inside the request future, so it is destroyed
//! when the request completes, fails, panics or is cancelled.
//!
//! Outside of any task scope the calling thread's own slot is used, but only
//! where a thread is the unit of work: plain threads, or a section held open
//! by an [`enter`] guard (e.g. inside `spawn_blocking`). Runtime worker threads
//! are shared by many tasks, so an unscoped task has no slot at all: it reads
//! `None` and its `bind` is ignored.

use std::cell::Cell;
use std::future::Future;
use std::marker::PhantomData;

pub type PrincipalId = i64;

tokio::task_local! {
    static TASK_SLOT: Cell<Option<PrincipalId>>;
}

thread_local! {
    static THREAD_SLOT: Cell<Option<PrincipalId>> = const { Cell::new(None) };
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
}

fn thread_slot_usable() -> bool {
    GUARD_DEPTH.with(Cell::get) > 0 || tokio::runtime::Handle::try_current().is_err()
}

/// `None` when the caller is an unscoped task on a runtime thread.
fn with_slot<R>(f: impl Fn(&Cell<Option<PrincipalId>>) -> R) -> Option<R> {
    if let Ok(out) = TASK_SLOT.try_with(|slot| f(slot)) {
        return Some(out);
    }
    if thread_slot_usable() {
        return Some(THREAD_SLOT.with(|slot| f(slot)));
    }
    None
}

/// Bind `id` to the current execution unit, replacing any previous binding.
pub fn bind(id: PrincipalId) {
    if with_slot(|slot| slot.set(Some(id))).is_none() {
        tracing::warn!(id, "identity bind outside a request scope ignored");
    }
}

/// The principal bound to the current execution unit, if any.
pub fn current() -> Option<PrincipalId> {
    with_slot(Cell::get).flatten()
}

/// Remove the binding of the current execution unit. Safe to call repeatedly.
pub fn clear() {
    let _ = with_slot(|slot| slot.set(None));
}

/// Run `fut` inside a fresh, empty identity slot.
pub async fn scope<F>(fut: F) -> F::Output
where
    F: Future,
{
    TASK_SLOT.scope(Cell::new(None), fut).await
}

/// Run `fut` inside a fresh identity slot already bound to `id`.
pub async fn scope_as<F>(id: PrincipalId, fut: F) -> F::Output
where
    F: Future,
{
    TASK_SLOT.scope(Cell::new(Some(id)), fut).await
}

/// Carry the caller's binding into a future that will run on another task.
///
/// Task-locals do not follow `tokio::spawn`, so background work started from
/// a request handler has to be wrapped explicitly:
///
/// ```ignore
/// tokio::spawn(context::propagate(async move { audit(context::current()).await }));
/// ```
pub async fn propagate<F>(fut: F) -> F::Output
where
    F: Future,
{
    let inherited = current();
    TASK_SLOT.scope(Cell::new(inherited), fut).await
}

/// Carry the caller's binding into a closure destined for `spawn_blocking`.
pub fn propagate_blocking<F, R>(f: F) -> impl FnOnce() -> R + Send + 'static
where
    F: FnOnce() -> R + Send + 'static,
    R: 'static,
{
    let inherited = current();
    move || match inherited {
        Some(id) => {
            let _guard = enter(id);
            f()
        }
        None => f(),
    }
}

/// Bind `id` for a synchronous section; the previous binding is restored when
/// the guard drops.
///
/// The guard is `!Send`: it must be dropped on the thread that created it.
#[must_use = "the binding is removed as soon as the guard is dropped"]
pub fn enter(id: PrincipalId) -> BindingGuard {
    GUARD_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let previous = with_slot(|slot| slot.replace(Some(id))).flatten();
    BindingGuard {
        previous,
        _not_send: PhantomData,
    }
}

#[derive(Debug)]
pub struct BindingGuard {
    previous: Option<PrincipalId>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        let _ = with_slot(|slot| slot.set(previous));
        GUARD_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_before_bind() {
        std::thread::spawn(|| assert_eq!(current(), None))
            .join()
            .unwrap();
    }

    #[test]
    fn test_bind_then_current_on_thread() {
        std::thread::spawn(|| {
            bind(42);
            assert_eq!(current(), Some(42));
            bind(i64::MIN);
            assert_eq!(current(), Some(i64::MIN));
            clear();
            assert_eq!(current(), None);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_clear_is_idempotent() {
        std::thread::spawn(|| {
            clear();
            bind(7);
            clear();
            clear();
            clear();
            assert_eq!(current(), None);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_threads_are_isolated() {
        let (bound_tx, bound_rx) = std::sync::mpsc::channel();
        let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();

        let a = std::thread::spawn(move || {
            bind(1);
            bound_tx.send(()).unwrap();
            done_rx.recv().unwrap();
            current()
        });

        bound_rx.recv().unwrap();
        let b = std::thread::spawn(current).join().unwrap();
        done_tx.send(()).unwrap();

        assert_eq!(b, None);
        assert_eq!(a.join().unwrap(), Some(1));
    }

    #[test]
    fn test_guard_restores_previous_binding() {
        std::thread::spawn(|| {
            {
                let _outer = enter(10);
                {
                    let _inner = enter(20);
                    assert_eq!(current(), Some(20));
                }
                assert_eq!(current(), Some(10));
            }
            assert_eq!(current(), None);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_guard_clears_on_panic() {
        std::thread::spawn(|| {
            let result = std::panic::catch_unwind(|| {
                let _guard = enter(99);
                panic!("handler failed");
            });
            assert!(result.is_err());
            assert_eq!(current(), None);
        })
        .join()
        .unwrap();
    }

    #[tokio::test]
    async fn test_scope_starts_empty_and_binds() {
        let observed = scope(async {
            assert_eq!(current(), None);
            bind(5);
            tokio::task::yield_now().await;
            current()
        })
        .await;
        assert_eq!(observed, Some(5));
        assert_eq!(current(), None);
    }

    #[tokio::test]
    async fn test_scope_as_is_visible_deep_in_the_stack() {
        async fn deep() -> Option<PrincipalId> {
            tokio::task::yield_now().await;
            current()
        }

        let observed = scope_as(77, async { deep().await }).await;
        assert_eq!(observed, Some(77));
    }

    #[tokio::test]
    async fn test_scope_shadows_thread_slot() {
        let _guard = enter(3);
        let inside = scope(async { current() }).await;
        assert_eq!(inside, None);
        assert_eq!(current(), Some(3));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tasks_are_isolated() {
        let mut handles = Vec::new();
        for id in 0..64_i64 {
            handles.push(tokio::spawn(scope(async move {
                bind(id);
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                    assert_eq!(current(), Some(id));
                }
                current()
            })));
        }
        for (id, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), Some(id as i64));
        }
    }

    #[tokio::test]
    async fn test_spawned_task_does_not_inherit_without_propagate() {
        let (plain, propagated) = scope_as(8, async {
            let plain = tokio::spawn(async { current() }).await.unwrap();
            let propagated = tokio::spawn(propagate(async { current() }))
                .await
                .unwrap();
            (plain, propagated)
        })
        .await;
        assert_eq!(plain, None);
        assert_eq!(propagated, Some(8));
    }

    #[tokio::test]
    async fn test_propagate_blocking_carries_binding() {
        let observed = scope_as(12, async {
            tokio::task::spawn_blocking(propagate_blocking(current))
                .await
                .unwrap()
        })
        .await;
        assert_eq!(observed, Some(12));
    }

    #[tokio::test]
    async fn test_binding_dropped_when_future_cancelled() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(scope_as(31, async move {
            let _ = rx.await;
        }));
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        drop(tx);
        assert_eq!(current(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_unscoped_tasks_share_no_slot() {
        // both tasks are polled by the single runtime thread
        tokio::spawn(async { bind(5) }).await.unwrap();
        let seen = tokio::spawn(async { current() }).await.unwrap();
        assert_eq!(seen, None);
        assert_eq!(current(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unscoped_bind_on_worker_is_ignored() {
        let seen = tokio::spawn(async {
            bind(6);
            current()
        })
        .await
        .unwrap();
        assert_eq!(seen, None);
    }

    #[tokio::test]
    async fn test_blocking_pool_thread_needs_guard() {
        let (unguarded, guarded, after) = tokio::task::spawn_blocking(|| {
            bind(9);
            let unguarded = current();
            let guarded = {
                let _guard = enter(9);
                current()
            };
            (unguarded, guarded, current())
        })
        .await
        .unwrap();
        assert_eq!(unguarded, None);
        assert_eq!(guarded, Some(9));
        assert_eq!(after, None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_reused_unit_does_not_see_previous_request() {
        // both requests run on the single runtime thread
        let first = scope(async {
            bind(1001);
            let seen = async { current() }.await;
            clear();
            seen
        })
        .await;
        assert_eq!(first, Some(1001));

        let second = scope(async { current() }).await;
        assert_eq!(second, None);
    }
}
