use std::{
    fmt,
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    api::{ApiError, ExpenseApi, ExpenseQuery},
    expense::{Expense, ExpenseId, NewExpense},
    month::MonthKey,
    notify::{Notifier, Toast, ToastKind},
};

/// An in-memory backend.
#[derive(Debug, Default)]
pub(crate) struct FakeExpenseApi {
    expenses: Mutex<Vec<Expense>>,
    next_id: AtomicU64,
    list_calls: AtomicUsize,
    list_failure: Mutex<Option<ApiError>>,
    month_failure: Mutex<Option<(MonthKey, ApiError)>>,
    write_failure: Mutex<Option<ApiError>>,
    held_list: Mutex<Option<Arc<Notify>>>,
}

/// Releases a list response held by [FakeExpenseApi::hold_next_list].
pub(crate) struct HeldResponse(Arc<Notify>);

impl HeldResponse {
    pub(crate) fn release(&self) {
        self.0.notify_one();
    }
}

impl FakeExpenseApi {
    pub(crate) fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Mutex::new(expenses),
            ..Default::default()
        }
    }

    /// Fail the next list request with `error`.
    pub(crate) fn fail_next_list(&self, error: ApiError) {
        *self.list_failure.lock().unwrap() = Some(error);
    }

    /// Fail the next list request for `month` with `error`.
    pub(crate) fn fail_next_list_for(&self, month: MonthKey, error: ApiError) {
        *self.month_failure.lock().unwrap() = Some((month, error));
    }

    /// Store `expense` as if another client had created it.
    pub(crate) fn insert(&self, expense: Expense) {
        self.expenses.lock().unwrap().push(expense);
    }

    /// Fail the next create, update or delete request with `error`.
    pub(crate) fn fail_next_write(&self, error: ApiError) {
        *self.write_failure.lock().unwrap() = Some(error);
    }

    /// Make the next list request wait until the returned handle is released.
    ///
    /// The response is built when the request arrives, so changes made while
    /// it is held are not part of it.
    pub(crate) fn hold_next_list(&self) -> HeldResponse {
        let notify = Arc::new(Notify::new());
        *self.held_list.lock().unwrap() = Some(notify.clone());
        HeldResponse(notify)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) async fn wait_for_list_calls(&self, count: usize) {
        while self.list_calls() < count {
            tokio::task::yield_now().await;
        }
    }

    fn list_response(&self, query: ExpenseQuery) -> Result<Vec<Expense>, ApiError> {
        if let Some(error) = self.list_failure.lock().unwrap().take() {
            return Err(error);
        }

        let failure = {
            let mut month_failure = self.month_failure.lock().unwrap();
            let matches = month_failure
                .as_ref()
                .is_some_and(|(month, _)| query.month == Some(*month));
            if matches { month_failure.take() } else { None }
        };
        if let Some((_, error)) = failure {
            return Err(error);
        }

        let expenses = self.expenses.lock().unwrap();
        Ok(expenses
            .iter()
            .filter(|expense| query.month.is_none_or(|month| expense.month() == month))
            .cloned()
            .collect())
    }

    fn take_write_failure(&self) -> Result<(), ApiError> {
        match self.write_failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExpenseApi for FakeExpenseApi {
    async fn list_expenses(&self, query: ExpenseQuery) -> Result<Vec<Expense>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let response = self.list_response(query);

        let held = self.held_list.lock().unwrap().take();
        if let Some(held) = held {
            held.notified().await;
        }

        response
    }

    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, ApiError> {
        self.take_write_failure()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = expense.clone().into_expense(ExpenseId::new(format!("new-{id}")));
        self.expenses.lock().unwrap().push(created.clone());

        Ok(created)
    }

    async fn update_expense(
        &self,
        id: &ExpenseId,
        expense: &NewExpense,
    ) -> Result<Expense, ApiError> {
        self.take_write_failure()?;

        let mut expenses = self.expenses.lock().unwrap();
        let existing = expenses
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or(ApiError::NotFound)?;
        *existing = expense.clone().into_expense(id.clone());

        Ok(existing.clone())
    }

    async fn delete_expense(&self, id: &ExpenseId) -> Result<(), ApiError> {
        self.take_write_failure()?;

        let mut expenses = self.expenses.lock().unwrap();
        let position = expenses
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(ApiError::NotFound)?;
        expenses.remove(position);

        Ok(())
    }
}

/// Keeps every toast it is given.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub(crate) fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub(crate) fn error_messages(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.kind == ToastKind::Error)
            .map(|toast| toast.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

type ToastCallback = Box<dyn Fn(&Toast) + Send + Sync>;

/// Runs a callback for every toast, e.g. to read a view model's state from
/// inside [Notifier::notify].
#[derive(Default)]
pub(crate) struct CallbackNotifier {
    callback: OnceLock<ToastCallback>,
    calls: AtomicUsize,
}

impl CallbackNotifier {
    pub(crate) fn set_callback(&self, callback: impl Fn(&Toast) + Send + Sync + 'static) {
        if self.callback.set(Box::new(callback)).is_err() {
            panic!("callback already set");
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CallbackNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackNotifier")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl Notifier for CallbackNotifier {
    fn notify(&self, toast: Toast) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(callback) = self.callback.get() {
            callback(&toast);
        }
    }
}
