use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::api::{self, AppState};
use crate::browser;
use crate::clients::SubmitClient;
use crate::config::Config;
use crate::orchestrator::session::QuizSolver;
use crate::services::{BrowserPageReader, LlmService};
use crate::utils::logging::log_startup;
use crate::workflow::QuizFlow;

/// 应用主结构
///
/// 持有浏览器和共享的答题编排器，负责启动 HTTP 服务
pub struct App {
    config: Arc<Config>,
    browser: Arc<Browser>,
    solver: Arc<QuizSolver>,
}

impl App {
    /// 初始化应用：启动浏览器，组装各个组件
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        if config.student_secret.is_empty() {
            warn!("⚠️ 未配置 STUDENT_SECRET，所有答题请求都会被拒绝");
        }
        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未配置 OPENAI_API_KEY，LLM 调用将会失败");
        }

        tokio::fs::create_dir_all(&config.temp_dir)
            .await
            .with_context(|| format!("无法创建临时目录 {}", config.temp_dir.display()))?;

        let browser = Arc::new(browser::launch_headless_browser(&config).await?);
        info!("✓ 浏览器已启动");

        let llm = Arc::new(LlmService::new(&config));
        let page_reader = Arc::new(BrowserPageReader::new(browser.clone(), &config));
        let submitter = Arc::new(SubmitClient::new(config.submit_timeout())?);

        let flow = QuizFlow::new(
            page_reader,
            llm.clone(),
            llm,
            submitter,
            config.temp_dir.clone(),
        );
        let solver = Arc::new(QuizSolver::new(flow, config.time_budget()));

        Ok(Self {
            config: Arc::new(config),
            browser,
            solver,
        })
    }

    /// 运行 HTTP 服务，直到收到 Ctrl-C
    pub async fn run(self) -> Result<()> {
        let state = AppState {
            config: self.config.clone(),
            solver: self.solver.clone(),
        };
        let app = api::router(state);

        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("无法监听 {}", bind_addr))?;
        info!("✓ 服务已启动: http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("👋 服务已停止");
        drop(self.solver);
        match Arc::try_unwrap(self.browser) {
            Ok(mut browser) => {
                if let Err(e) = browser.close().await {
                    debug!("关闭浏览器失败: {}", e);
                }
            }
            Err(_) => debug!("浏览器仍被引用，跳过关闭"),
        }

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ 无法监听 Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 收到退出信号，正在关闭服务...");
}
