//! Оптимистичные мутации как явный конечный автомат. Локальное значение
//! правится синхронно, сервер подтверждает мутацию, сверочный GET всегда
//! перетирает локальное состояние ("последний GET побеждает" — принятая
//! гонка, а не недосмотр).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SyncState {
    /// Локальное состояние совпадает с последним ответом сервера
    #[default]
    Clean,
    /// Применена оптимистичная правка, запрос ещё не подтверждён
    OptimisticPending,
    /// Мутация подтверждена, идёт сверочный GET
    Reconciling,
    /// Мутация не прошла, выполнен откат к снимку
    Error,
}

/// Коллекция (или агрегат) со снимком для отката
#[derive(Debug, Clone)]
pub struct Tracked<T: Clone> {
    value: T,
    snapshot: Option<T>,
    state: SyncState,
}

impl<T: Clone> Tracked<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            snapshot: None,
            state: SyncState::Clean,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Синхронная правка поверх текущего локального состояния. Снимок —
    /// непосредственно предыдущее состояние: слоящиеся мутации каждая
    /// запоминают своё "до".
    pub fn apply_optimistic<F: FnOnce(&mut T)>(&mut self, mutate: F) {
        self.snapshot = Some(self.value.clone());
        mutate(&mut self.value);
        self.state = SyncState::OptimisticPending;
    }

    /// Мутация подтверждена сервером, запущен сверочный GET
    pub fn begin_reconcile(&mut self) {
        self.state = SyncState::Reconciling;
    }

    /// Ответ сверочного GET: серверная версия всегда побеждает локальную
    /// догадку, из какого бы состояния ни пришла.
    pub fn reconciled(&mut self, server: T) {
        self.value = server;
        self.snapshot = None;
        self.state = SyncState::Clean;
    }

    /// Мутация не прошла: откат к снимку. Если снимка нет (уже
    /// перетёрт сверкой) — остаёмся на текущем значении.
    pub fn rollback(&mut self) {
        if let Some(prev) = self.snapshot.take() {
            self.value = prev;
        }
        self.state = SyncState::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Неудачная оптимистичная правка + повтор с успехом даёт то же
    // состояние, что успех с первой попытки
    #[test]
    fn failed_then_retried_equals_first_try_success() {
        let server_after = vec![1, 2, 3, 99];

        // успех с первой попытки
        let mut direct = Tracked::new(vec![1, 2, 3]);
        direct.apply_optimistic(|v| v.push(99));
        direct.begin_reconcile();
        direct.reconciled(server_after.clone());

        // неудача, откат, повтор
        let mut retried = Tracked::new(vec![1, 2, 3]);
        retried.apply_optimistic(|v| v.push(99));
        retried.rollback();
        assert_eq!(retried.value(), &vec![1, 2, 3]);
        assert_eq!(retried.state(), SyncState::Error);
        retried.apply_optimistic(|v| v.push(99));
        retried.begin_reconcile();
        retried.reconciled(server_after.clone());

        assert_eq!(direct.value(), retried.value());
        assert_eq!(retried.state(), SyncState::Clean);
    }

    #[test]
    fn transitions_follow_the_machine() {
        let mut t = Tracked::new(0);
        assert_eq!(t.state(), SyncState::Clean);
        t.apply_optimistic(|v| *v = 1);
        assert_eq!(t.state(), SyncState::OptimisticPending);
        t.begin_reconcile();
        assert_eq!(t.state(), SyncState::Reconciling);
        t.reconciled(2);
        assert_eq!(t.state(), SyncState::Clean);
        assert_eq!(*t.value(), 2);
    }

    // слоящиеся мутации: вторая стартует до сверки первой, каждый
    // сверочный GET перетирает локальное состояние целиком
    #[test]
    fn last_reconcile_wins_over_layered_mutations() {
        let mut t = Tracked::new(vec![1]);
        t.apply_optimistic(|v| v.push(2));
        t.apply_optimistic(|v| v.push(3));
        assert_eq!(t.value(), &vec![1, 2, 3]);

        // сверка первой мутации пришла позже второй правки — всё равно
        // перетирает
        t.reconciled(vec![1, 2]);
        assert_eq!(t.value(), &vec![1, 2]);
        assert_eq!(t.state(), SyncState::Clean);

        t.reconciled(vec![1, 2, 3]);
        assert_eq!(t.value(), &vec![1, 2, 3]);
    }

    #[test]
    fn rollback_restores_immediately_prior_snapshot() {
        let mut t = Tracked::new(vec![1]);
        t.apply_optimistic(|v| v.push(2));
        t.apply_optimistic(|v| v.push(3));
        // откат второй мутации возвращает состояние с первой
        t.rollback();
        assert_eq!(t.value(), &vec![1, 2]);
    }
}
