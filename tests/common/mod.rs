//! 集成测试共用的脚本化组件
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use quiz_solver::clients::Submitter;
use quiz_solver::models::{Plan, QuizPage, SubmissionPayload, SubmissionResult, TaskType};
use quiz_solver::services::{AnswerOracle, PageReader, PlanOracle};
use quiz_solver::{QuizFlow, QuizSolver, TimeBudget};

/// 按 URL 返回预设页面和文件
#[derive(Default)]
pub struct FakePageReader {
    pages: HashMap<String, QuizPage>,
    files: HashMap<String, Vec<u8>>,
    pub reads: AtomicUsize,
    pub downloads: Mutex<Vec<PathBuf>>,
}

impl FakePageReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, instructions: &str, submit_url: Option<&str>) -> Self {
        self.pages.insert(
            url.to_string(),
            QuizPage {
                instructions: instructions.to_string(),
                submit_url: submit_url.map(str::to_string),
            },
        );
        self
    }

    pub fn with_file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(url.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait]
impl PageReader for FakePageReader {
    async fn read_quiz(&self, url: &str) -> Result<QuizPage> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("页面不存在: {}", url))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.downloads.lock().unwrap().push(dest.to_path_buf());
        let Some(bytes) = self.files.get(url) else {
            bail!("文件不存在: {}", url);
        };
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }
}

/// 固定返回同一种任务类型；`None` 时模拟 LLM 失败
pub struct FakePlanner {
    task_type: Option<TaskType>,
    pub calls: AtomicUsize,
}

impl FakePlanner {
    pub fn returning(task_type: TaskType) -> Self {
        Self {
            task_type: Some(task_type),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            task_type: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PlanOracle for FakePlanner {
    async fn plan(&self, _instructions: &str) -> Result<Plan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.task_type {
            Some(task_type) => Ok(Plan::new(task_type, vec!["step".to_string()])),
            None => bail!("LLM 服务不可用"),
        }
    }
}

/// 固定返回同一个答案；`None` 时模拟 LLM 失败
pub struct FakeAnswerer {
    answer: Option<String>,
    delay: Duration,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeAnswerer {
    pub fn returning(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 每次作答前先等待一段时间
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AnswerOracle for FakeAnswerer {
    async fn answer(&self, data: &str, instruction: &str) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.calls
            .lock()
            .unwrap()
            .push((data.to_string(), instruction.to_string()));
        self.answer.clone().ok_or_else(|| anyhow!("LLM 服务不可用"))
    }
}

/// 按顺序返回预设的判定结果，用完后模拟网络错误
pub struct FakeSubmitter {
    responses: Mutex<VecDeque<SubmissionResult>>,
    pub submissions: Mutex<Vec<(String, SubmissionPayload)>>,
}

impl FakeSubmitter {
    pub fn new(responses: Vec<SubmissionResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl Submitter for FakeSubmitter {
    async fn submit(&self, submit_url: &str, payload: &SubmissionPayload) -> Result<SubmissionResult> {
        self.submissions
            .lock()
            .unwrap()
            .push((submit_url.to_string(), payload.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("connection refused"))
    }
}

pub fn verdict(correct: bool, next_url: Option<&str>) -> SubmissionResult {
    SubmissionResult {
        correct,
        url: next_url.map(str::to_string),
        reason: None,
    }
}

/// 组装好的一套脚本化组件
pub struct Harness {
    pub reader: Arc<FakePageReader>,
    pub planner: Arc<FakePlanner>,
    pub answerer: Arc<FakeAnswerer>,
    pub submitter: Arc<FakeSubmitter>,
    pub temp_dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(
        reader: FakePageReader,
        planner: FakePlanner,
        answerer: FakeAnswerer,
        submitter: FakeSubmitter,
    ) -> Self {
        Self {
            reader: Arc::new(reader),
            planner: Arc::new(planner),
            answerer: Arc::new(answerer),
            submitter: Arc::new(submitter),
            temp_dir: tempfile::tempdir().expect("创建临时目录失败"),
        }
    }

    pub fn solver(&self, budget: TimeBudget) -> QuizSolver {
        let flow = QuizFlow::new(
            self.reader.clone(),
            self.planner.clone(),
            self.answerer.clone(),
            self.submitter.clone(),
            self.temp_dir.path(),
        );
        QuizSolver::new(flow, budget)
    }

    /// 临时目录中残留的文件数
    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path())
            .expect("读取临时目录失败")
            .count()
    }
}
