//! Controller-owned queue of detached validations.
//!
//! Handlers only queue work here, so they never depend on an ambient
//! executor. Whoever awaits [`FormController::settled`](crate::FormController::settled)
//! polls the queue; on wasm32 the controller also starts a background driver.

use futures::StreamExt;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use std::cell::RefCell;
use std::future::Future;
use std::task::{Context, Poll};

#[derive(Default)]
pub(crate) struct LocalTasks {
	/// Tasks queued since the last poll
	incoming: RefCell<Vec<LocalBoxFuture<'static, ()>>>,
	running: RefCell<FuturesUnordered<LocalBoxFuture<'static, ()>>>,
}

impl LocalTasks {
	pub(crate) fn push<F>(&self, future: F)
	where
		F: Future<Output = ()> + 'static,
	{
		self.incoming.borrow_mut().push(Box::pin(future));
	}

	/// Polls every queued task. Ready once none is left.
	pub(crate) fn poll_drive(&self, cx: &mut Context<'_>) -> Poll<()> {
		let mut running = self.running.borrow_mut();
		loop {
			running.extend(self.incoming.borrow_mut().drain(..));
			match running.poll_next_unpin(cx) {
				Poll::Ready(Some(())) => continue,
				Poll::Ready(None) | Poll::Pending if !self.incoming.borrow().is_empty() => continue,
				Poll::Ready(None) => return Poll::Ready(()),
				Poll::Pending => return Poll::Pending,
			}
		}
	}
}

/// Drives queued validations in the background of the browser event loop.
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub(crate) fn spawn_driver<F>(driver: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(driver);
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;
	use std::future::poll_fn;
	use std::rc::Rc;

	#[rstest]
	#[tokio::test]
	async fn test_drive_runs_tasks_in_queue_order() {
		let tasks = LocalTasks::default();
		let seen = Rc::new(RefCell::new(Vec::new()));
		for n in 0..3 {
			let seen = Rc::clone(&seen);
			tasks.push(async move { seen.borrow_mut().push(n) });
		}

		poll_fn(|cx| tasks.poll_drive(cx)).await;

		assert_eq!(*seen.borrow(), [0, 1, 2]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_drive_waits_for_pending_tasks() {
		let tasks = LocalTasks::default();
		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		let done = Rc::new(Cell::new(false));
		tasks.push({
			let done = Rc::clone(&done);
			async move {
				let _ = rx.await;
				done.set(true);
			}
		});

		let drive = poll_fn(|cx| tasks.poll_drive(cx));
		let ((), ()) = tokio::join!(drive, async {
			tokio::task::yield_now().await;
			assert!(!done.get());
			tx.send(()).unwrap();
		});

		assert!(done.get());
	}
}
