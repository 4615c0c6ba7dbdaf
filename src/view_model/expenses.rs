//! The page-level owner of the expense list.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::task::JoinSet;

use crate::{
    api::{ApiError, ExpenseApi, ExpenseQuery},
    expense::{Expense, ExpenseId, NewExpense},
    notify::{Notifier, Toast, notify_failure},
    view_model::{LoadState, Resource},
};

const FETCH_FAILED: &str = "支出の取得に失敗しました";
const ADD_FAILED: &str = "支出の登録に失敗しました";
const ADD_MANY_FAILED: &str = "支出の一括登録に失敗しました";
const UPDATE_FAILED: &str = "支出の更新に失敗しました";
const DELETE_FAILED: &str = "支出の削除に失敗しました";

/// An immutable copy of the expense list handed to derived view models.
///
/// Every change to the list produces a snapshot with a new `version`, so the
/// version identifies the list's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseSnapshot {
    /// Identifies this version of the list.
    pub version: u64,
    /// The expenses, in the order the backend returned them.
    pub expenses: Arc<[Expense]>,
}

impl ExpenseSnapshot {
    /// The expenses in the snapshot.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }
}

/// A change the backend has confirmed.
#[derive(Debug, Clone)]
enum ListChange {
    /// Replace expenses with the same ID, or append them in order.
    Upsert(Vec<Expense>),
    /// Remove the expense with this ID.
    Remove(ExpenseId),
}

impl ListChange {
    /// Apply the change. Applying it to a list that already contains it
    /// leaves the list as it is.
    fn apply(&self, expenses: &mut Vec<Expense>) {
        match self {
            ListChange::Upsert(confirmed) => {
                for expense in confirmed {
                    match expenses.iter_mut().find(|existing| existing.id == expense.id) {
                        Some(existing) => *existing = expense.clone(),
                        None => expenses.push(expense.clone()),
                    }
                }
            }
            ListChange::Remove(id) => expenses.retain(|expense| &expense.id != id),
        }
    }
}

/// Owns the expense list for a page.
///
/// Mutations go through the backend first. The list only changes once the
/// backend has confirmed the change. Changes confirmed while a fetch is in
/// flight are replayed onto the fetched list, since the backend may have built
/// that list before the change.
#[derive(Debug)]
pub struct ExpenseListModel {
    api: Arc<dyn ExpenseApi>,
    notifier: Arc<dyn Notifier>,
    query: ExpenseQuery,
    resource: Resource<ExpenseSnapshot>,
    /// Changes confirmed while the list was loading. Only locked while the
    /// resource is locked.
    pending: Mutex<Vec<ListChange>>,
    next_version: AtomicU64,
}

impl ExpenseListModel {
    /// Create a model that lists the expenses matching `query`.
    pub fn new(api: Arc<dyn ExpenseApi>, notifier: Arc<dyn Notifier>, query: ExpenseQuery) -> Self {
        Self {
            api,
            notifier,
            query,
            resource: Resource::new(),
            pending: Mutex::new(Vec::new()),
            next_version: AtomicU64::new(1),
        }
    }

    /// The current state of the list.
    pub fn state(&self) -> LoadState<ExpenseSnapshot> {
        self.resource.state()
    }

    fn snapshot(&self, expenses: impl Into<Arc<[Expense]>>) -> ExpenseSnapshot {
        ExpenseSnapshot {
            version: self.next_version.fetch_add(1, Ordering::Relaxed),
            expenses: expenses.into(),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<ListChange>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a confirmed change to the list.
    ///
    /// A loaded list gets a new snapshot. While a fetch is in flight the change
    /// is kept and applied to the fetched list when it arrives.
    fn splice(&self, change: ListChange) {
        self.resource.with_state(|state| match state {
            LoadState::Ready(snapshot) => {
                let mut expenses = snapshot.expenses.to_vec();
                change.apply(&mut expenses);
                *snapshot = self.snapshot(expenses);
            }
            LoadState::Loading => self.pending().push(change),
            LoadState::Uninitialized => {
                tracing::debug!("expense list not loaded yet, the next fetch will include the change");
            }
        });
    }

    /// Fetch the list from the backend.
    ///
    /// On failure the list settles empty and an error toast is shown.
    pub async fn fetch(&self) {
        let ticket = self.resource.begin();
        let result = self.api.list_expenses(self.query).await;

        let (expenses, failure) = match result {
            Ok(expenses) => {
                tracing::debug!("fetched {} expenses", expenses.len());
                (expenses, None)
            }
            Err(error) => (Vec::new(), Some(error)),
        };

        let settled = self.resource.settle(ticket, || {
            let mut expenses = expenses;
            for change in self.pending().drain(..) {
                change.apply(&mut expenses);
            }
            self.snapshot(expenses)
        });

        if !settled {
            tracing::debug!("discarding stale expense list response");
            return;
        }

        if let Some(error) = failure {
            notify_failure(self.notifier.as_ref(), &error, FETCH_FAILED);
        }
    }

    /// Create an expense and add it to the list.
    ///
    /// # Returns
    /// The expense as stored by the backend, or `None` if the backend
    /// rejected it (an error toast has already been shown).
    pub async fn add(&self, expense: NewExpense) -> Option<Expense> {
        match self.api.create_expense(&expense).await {
            Ok(created) => {
                self.splice(ListChange::Upsert(vec![created.clone()]));
                self.notifier.notify(Toast::success("支出を登録しました"));
                Some(created)
            }
            Err(error) => {
                notify_failure(self.notifier.as_ref(), &error, ADD_FAILED);
                None
            }
        }
    }

    /// Create several expenses at once.
    ///
    /// The requests are sent concurrently. Expenses the backend confirms are
    /// added to the list in their original order. Any failure is reported as a
    /// single error toast without saying which expenses failed.
    ///
    /// # Returns
    /// `true` if every expense was created.
    pub async fn add_many(&self, expenses: Vec<NewExpense>) -> bool {
        if expenses.is_empty() {
            return true;
        }

        let mut requests = JoinSet::new();
        for (index, expense) in expenses.into_iter().enumerate() {
            let api = Arc::clone(&self.api);
            requests.spawn(async move { (index, api.create_expense(&expense).await) });
        }

        let mut created: Vec<(usize, Expense)> = Vec::new();
        let mut first_error: Option<ApiError> = None;

        while let Some(joined) = requests.join_next().await {
            match joined {
                Ok((index, Ok(expense))) => created.push((index, expense)),
                Ok((_, Err(error))) => {
                    first_error.get_or_insert(error);
                }
                Err(error) => {
                    tracing::error!("create expense task failed: {error}");
                    first_error.get_or_insert(ApiError::Network(error.to_string()));
                }
            }
        }

        created.sort_by_key(|(index, _)| *index);
        if !created.is_empty() {
            self.splice(ListChange::Upsert(
                created.into_iter().map(|(_, expense)| expense).collect(),
            ));
        }

        match first_error {
            Some(error) => {
                notify_failure(self.notifier.as_ref(), &error, ADD_MANY_FAILED);
                false
            }
            None => {
                self.notifier.notify(Toast::success("支出をまとめて登録しました"));
                true
            }
        }
    }

    /// Replace the expense with `id`.
    ///
    /// # Returns
    /// The updated expense, or `None` on failure.
    pub async fn update(&self, id: &ExpenseId, expense: NewExpense) -> Option<Expense> {
        match self.api.update_expense(id, &expense).await {
            Ok(updated) => {
                self.splice(ListChange::Upsert(vec![updated.clone()]));
                self.notifier.notify(Toast::success("支出を更新しました"));
                Some(updated)
            }
            Err(error) => {
                notify_failure(self.notifier.as_ref(), &error, UPDATE_FAILED);
                None
            }
        }
    }

    /// Delete the expense with `id`.
    ///
    /// # Returns
    /// `true` if the backend deleted the expense.
    pub async fn delete(&self, id: &ExpenseId) -> bool {
        match self.api.delete_expense(id).await {
            Ok(()) => {
                self.splice(ListChange::Remove(id.clone()));
                self.notifier.notify(Toast::success("支出を削除しました"));
                true
            }
            Err(error) => {
                notify_failure(self.notifier.as_ref(), &error, DELETE_FAILED);
                false
            }
        }
    }
}
