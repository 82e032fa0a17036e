pub mod attempt_vm;
pub mod dashboard_vm;
pub mod login_vm;
pub mod monitoring_vm;
pub mod nav_vm;
pub mod results_vm;
pub mod time_fmt;

pub use attempt_vm::{
    BannerKind, BannerVm, OptionVm, QuestionVm, TimerTone, TimerVm, confirm_copy, map_questions,
    phase_banner, progress_label, timer_vm,
};
pub use dashboard_vm::{
    StatCardVm, StudentDashboardVm, TestCardVm, map_student_dashboard, map_test_card,
};
pub use login_vm::login_error_message;
pub use monitoring_vm::{MonitorBoardVm, StudentRowVm, map_board};
pub use nav_vm::{NavItemVm, nav_items};
pub use results_vm::{ResultRowVm, map_result_rows};
pub use time_fmt::{format_countdown, format_datetime};
