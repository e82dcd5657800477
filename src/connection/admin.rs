use crate::driver::Driver;
use crate::error::SqlPortableError;

use super::Connection;

impl<D: Driver> Connection<D> {
    /// Rows changed by the last manipulation statement.
    ///
    /// # Errors
    /// `NotCapable` when the driver cannot report it.
    pub fn affected_rows(&self) -> Result<u64, SqlPortableError> {
        self.driver.affected_rows().map_err(|e| self.driver_error(e))
    }

    /// Next value of sequence `seq`, creating it first when `on_demand` is set and it is missing.
    ///
    /// # Errors
    /// `NotCapable` when the driver has no sequences, otherwise the backend's error.
    pub fn next_id(&mut self, seq: &str, on_demand: bool) -> Result<i64, SqlPortableError> {
        let name = self.get_sequence_name(seq);
        let id = self.driver.next_id(&name, on_demand);
        id.map_err(|e| self.driver_error(e))
    }

    /// # Errors
    /// `NotCapable` when the driver has no sequences, otherwise the backend's error.
    pub fn create_sequence(&mut self, seq: &str) -> Result<(), SqlPortableError> {
        let name = self.get_sequence_name(seq);
        let done = self.driver.create_sequence(&name);
        done.map_err(|e| self.driver_error(e))
    }

    /// # Errors
    /// `NotCapable` when the driver has no sequences, otherwise the backend's error.
    pub fn drop_sequence(&mut self, seq: &str) -> Result<(), SqlPortableError> {
        let name = self.get_sequence_name(seq);
        let done = self.driver.drop_sequence(&name);
        done.map_err(|e| self.driver_error(e))
    }

    /// # Errors
    /// `NotCapable` when the driver has no transactions, otherwise the backend's error.
    pub fn begin(&mut self) -> Result<(), SqlPortableError> {
        let done = self.driver.begin();
        done.map_err(|e| self.driver_error(e))
    }

    /// # Errors
    /// `NotCapable` when the driver has no transactions, otherwise the backend's error.
    pub fn commit(&mut self) -> Result<(), SqlPortableError> {
        let done = self.driver.commit();
        done.map_err(|e| self.driver_error(e))
    }

    /// # Errors
    /// `NotCapable` when the driver has no transactions, otherwise the backend's error.
    pub fn rollback(&mut self) -> Result<(), SqlPortableError> {
        let done = self.driver.rollback();
        done.map_err(|e| self.driver_error(e))
    }
}
