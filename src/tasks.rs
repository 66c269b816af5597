use crate::errors::FormError;
use crate::models::TaskEntry;
use serde::{Deserialize, Serialize};

pub const OTHER_OPTION: &str = "Other";
pub const NO_TASKS_MESSAGE: &str = "Please add at least one task";
pub const MISSING_FIELDS_MESSAGE: &str = "All fields (*) are mandatory for each task";

/// One task sub-form. Every field is named; nothing depends on markup order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskBlock {
    pub id: u64,
    /// Fetched companies followed by [`OTHER_OPTION`].
    pub options: Vec<String>,
    pub task_for: String,
    pub task_for_other: String,
    pub other_visible: bool,
    pub task_name: String,
    pub task_details: String,
    pub my_role: String,
}

/// Field values edited by the user for one block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskInput {
    #[serde(default)]
    pub task_for: String,
    #[serde(default)]
    pub task_for_other: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_details: String,
    #[serde(default)]
    pub my_role: String,
}

impl TaskBlock {
    pub fn new(id: u64, companies: &[String]) -> Self {
        let mut options = companies.to_vec();
        options.push(OTHER_OPTION.to_string());
        Self {
            id,
            options,
            task_for: String::new(),
            task_for_other: String::new(),
            other_visible: false,
            task_name: String::new(),
            task_details: String::new(),
            my_role: String::new(),
        }
    }

    pub fn select_task_for(&mut self, value: impl Into<String>) {
        self.task_for = value.into();
        self.other_visible = self.task_for == OTHER_OPTION;
    }

    pub fn apply(&mut self, input: TaskInput) {
        self.select_task_for(input.task_for);
        self.task_for_other = input.task_for_other;
        self.task_name = input.task_name;
        self.task_details = input.task_details;
        self.my_role = input.my_role;
    }

    /// The trimmed entry, or `None` when any required field is empty.
    pub fn entry(&self) -> Option<TaskEntry> {
        let mut task_for = self.task_for.trim();
        if task_for == OTHER_OPTION {
            task_for = self.task_for_other.trim();
        }
        let task_name = self.task_name.trim();
        let task_details = self.task_details.trim();
        let my_role = self.my_role.trim();

        if [task_for, task_name, task_details, my_role]
            .iter()
            .any(|field| field.is_empty())
        {
            return None;
        }

        Some(TaskEntry {
            task_for: task_for.to_string(),
            task_name: task_name.to_string(),
            task_details: task_details.to_string(),
            my_role: my_role.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskBlocks {
    blocks: Vec<TaskBlock>,
    next_id: u64,
}

impl TaskBlocks {
    pub fn push(&mut self, companies: &[String]) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.blocks.push(TaskBlock::new(id, companies));
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|block| block.id != id);
        self.blocks.len() != before
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut TaskBlock> {
        self.blocks.iter_mut().find(|block| block.id == id)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskBlock> {
        self.blocks.iter()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.blocks.iter().map(|block| block.id).collect()
    }

    /// Entries for a checkout, in block order. Fails on zero blocks or any empty field.
    pub fn entries(&self) -> Result<Vec<TaskEntry>, FormError> {
        if self.blocks.is_empty() {
            return Err(FormError::validation(NO_TASKS_MESSAGE));
        }
        self.blocks
            .iter()
            .map(|block| {
                block
                    .entry()
                    .ok_or_else(|| FormError::validation(MISSING_FIELDS_MESSAGE))
            })
            .collect()
    }
}
